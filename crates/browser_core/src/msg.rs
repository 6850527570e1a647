use crate::{Endpoint, JobId, JobReport, Ticket};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User asked for a listing of `path` on `endpoint`.
    ListRequested { endpoint: Endpoint, path: String },
    /// List a path that was normalized before, e.g. one restored from a
    /// saved session. Percent sequences in it are not decoded again.
    ReopenRequested { endpoint: Endpoint, path: String },
    /// User opened a subdirectory of the current listing.
    DescendRequested { child: String },
    /// User clicked "go to parent".
    ParentRequested,
    /// User asked to list the current path again.
    RefreshRequested,
    /// User abandoned the job in flight.
    CancelRequested,
    /// Engine: the backend created a job for the submission.
    JobAccepted { ticket: Ticket, job_id: JobId },
    /// Engine: the list request itself failed.
    SubmitFailed { ticket: Ticket, message: String },
    /// Engine: a status poll came back.
    PollCompleted {
        ticket: Ticket,
        job_id: JobId,
        report: JobReport,
    },
    /// Engine: the status request itself failed.
    PollFailed {
        ticket: Ticket,
        job_id: JobId,
        message: String,
    },
}
