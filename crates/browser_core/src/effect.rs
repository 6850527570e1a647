use std::time::Duration;

use crate::{CopyRequest, JobId, Ticket};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Issue `GET /list` for the given site and normalized path.
    SubmitListing {
        ticket: Ticket,
        site: String,
        path: String,
    },
    /// Poll `GET /status` for `job_id` after `delay`.
    SchedulePoll {
        ticket: Ticket,
        job_id: JobId,
        delay: Duration,
    },
    /// Stop any poll still scheduled for `ticket`.
    CancelPolls { ticket: Ticket },
    /// Issue `GET /copy`.
    IssueCopy { request: CopyRequest },
}
