use thiserror::Error;

use crate::{CopyCheck, JobId};

/// Errors surfaced to the UI for a panel or a copy request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    #[error("no endpoint selected")]
    Selection,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("job {job_id} failed")]
    JobFailed { job_id: JobId },
    #[error("gave up after {attempts} polls without a result")]
    PollExhausted { attempts: u32 },
    #[error("copy not possible: {0}")]
    CopyPrecondition(CopyCheck),
}
