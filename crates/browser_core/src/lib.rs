//! Browser core: per-panel job controller, path navigation and copy gating.
//!
//! Everything here is pure. IO is requested through [`Effect`]s and results
//! come back as [`Msg`]s.
pub mod copy;
mod effect;
mod error;
mod listing;
mod msg;
pub mod path;
mod state;
mod update;
mod view_model;

pub use copy::{CopyCheck, CopyRequest, CopyVerdict};
pub use effect::Effect;
pub use error::ControllerError;
pub use listing::{BackendStatus, JobReport, ListingEntry};
pub use msg::Msg;
pub use state::{
    Endpoint, JobHandle, JobId, JobStatus, PanelId, PanelState, PollPolicy, Ticket,
    DEFAULT_ATTEMPT_BUDGET, DEFAULT_POLL_DELAY, UNSELECTED_ENDPOINT_LABEL,
};
pub use update::update;
pub use view_model::PanelView;
