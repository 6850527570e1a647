use std::fmt;
use std::time::Duration;

use crate::path::ROOT;
use crate::view_model::PanelView;
use crate::{ControllerError, ListingEntry};

/// Label shown by endpoint pickers before anything is chosen.
pub const UNSELECTED_ENDPOINT_LABEL: &str = "-- select endpoint --";

pub const DEFAULT_ATTEMPT_BUDGET: u32 = 10;
pub const DEFAULT_POLL_DELAY: Duration = Duration::from_secs(2);

/// Identifies one browsing panel for its whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PanelId(pub u64);

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "panel#{}", self.0)
    }
}

/// Tags every effect and every engine result with the submission it belongs to.
///
/// A result whose ticket no longer matches the panel's current ticket comes
/// from an orphaned job chain and is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    pub panel: PanelId,
    pub generation: u64,
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/gen{}", self.panel, self.generation)
    }
}

/// Backend job identifier, opaque to the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobId(String);

impl JobId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A remote site, or the placeholder meaning nothing was picked yet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Endpoint {
    #[default]
    Unselected,
    Site(String),
}

impl Endpoint {
    /// Maps a picker label to an endpoint. Blank labels and the placeholder are unselected.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        if label.is_empty() || label == UNSELECTED_ENDPOINT_LABEL {
            Endpoint::Unselected
        } else {
            Endpoint::Site(label.to_string())
        }
    }

    pub fn site(&self) -> Option<&str> {
        match self {
            Endpoint::Unselected => None,
            Endpoint::Site(name) => Some(name),
        }
    }

    pub fn is_selected(&self) -> bool {
        self.site().is_some()
    }

    pub fn label(&self) -> &str {
        self.site().unwrap_or(UNSELECTED_ENDPOINT_LABEL)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobStatus {
    #[default]
    Idle,
    Submitting,
    Polling,
    Done,
    Failed,
    Stuck,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Failed | JobStatus::Stuck)
    }

    pub fn is_in_flight(self) -> bool {
        matches!(self, JobStatus::Submitting | JobStatus::Polling)
    }

    pub fn label(self) -> &'static str {
        match self {
            JobStatus::Idle => "idle",
            JobStatus::Submitting => "submitting",
            JobStatus::Polling => "working",
            JobStatus::Done => "done",
            JobStatus::Failed => "job failed",
            JobStatus::Stuck => "gave up",
        }
    }
}

/// How often and how long a panel polls before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub attempt_budget: u32,
    pub delay: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            attempt_budget: DEFAULT_ATTEMPT_BUDGET,
            delay: DEFAULT_POLL_DELAY,
        }
    }
}

/// The backend job a panel is currently tracking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandle {
    job_id: JobId,
    attempts_remaining: u32,
    status: JobStatus,
}

impl JobHandle {
    pub(crate) fn new(job_id: JobId, attempt_budget: u32) -> Self {
        Self {
            job_id,
            attempts_remaining: attempt_budget,
            status: JobStatus::Polling,
        }
    }

    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    pub fn attempts_remaining(&self) -> u32 {
        self.attempts_remaining
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    /// Spends one attempt on a "still working" answer. Returns the new status.
    pub(crate) fn spend_attempt(&mut self) -> JobStatus {
        if self.status.is_terminal() {
            return self.status;
        }
        self.attempts_remaining = self.attempts_remaining.saturating_sub(1);
        if self.attempts_remaining == 0 {
            self.status = JobStatus::Stuck;
        }
        self.status
    }

    /// Moves to a terminal status. Terminal handles never change again.
    pub(crate) fn finish(&mut self, status: JobStatus) {
        debug_assert!(status.is_terminal());
        if !self.status.is_terminal() {
            self.status = status;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum Lifecycle {
    #[default]
    Idle,
    Submitting,
    Tracking(JobHandle),
    /// The submission itself failed; there is no job to track.
    Rejected,
}

/// Per-panel job controller state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelState {
    id: PanelId,
    policy: PollPolicy,
    endpoint: Endpoint,
    path: String,
    generation: u64,
    lifecycle: Lifecycle,
    listing: Vec<ListingEntry>,
    error: Option<ControllerError>,
    dirty: bool,
}

impl Default for PanelState {
    fn default() -> Self {
        Self::new(PanelId(0))
    }
}

impl PanelState {
    pub fn new(id: PanelId) -> Self {
        Self::with_policy(id, PollPolicy::default())
    }

    pub fn with_policy(id: PanelId, policy: PollPolicy) -> Self {
        Self {
            id,
            policy,
            endpoint: Endpoint::Unselected,
            path: ROOT.to_string(),
            generation: 0,
            lifecycle: Lifecycle::Idle,
            listing: Vec::new(),
            error: None,
            dirty: false,
        }
    }

    pub fn id(&self) -> PanelId {
        self.id
    }

    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Normalized path of the most recent submission.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn ticket(&self) -> Ticket {
        Ticket {
            panel: self.id,
            generation: self.generation,
        }
    }

    pub fn status(&self) -> JobStatus {
        match &self.lifecycle {
            Lifecycle::Idle => JobStatus::Idle,
            Lifecycle::Submitting => JobStatus::Submitting,
            Lifecycle::Tracking(handle) => handle.status(),
            Lifecycle::Rejected => JobStatus::Failed,
        }
    }

    pub fn job(&self) -> Option<&JobHandle> {
        match &self.lifecycle {
            Lifecycle::Tracking(handle) => Some(handle),
            _ => None,
        }
    }

    /// Listing of the current job. Empty unless the job is done.
    pub fn listing(&self) -> &[ListingEntry] {
        &self.listing
    }

    pub fn error(&self) -> Option<&ControllerError> {
        self.error.as_ref()
    }

    pub fn view(&self) -> PanelView {
        PanelView {
            panel: self.id,
            endpoint: self.endpoint.clone(),
            path: self.path.clone(),
            status: self.status(),
            job_id: self.job().map(|handle| handle.job_id().clone()),
            attempts_remaining: self.job().map(JobHandle::attempts_remaining),
            entries: self.listing.clone(),
            error: self.error.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// True when `ticket` and `job_id` still describe the live job this panel tracks.
    pub(crate) fn is_current(&self, ticket: Ticket, job_id: Option<&JobId>) -> bool {
        if ticket != self.ticket() {
            return false;
        }
        match (job_id, &self.lifecycle) {
            (None, Lifecycle::Submitting) => true,
            (Some(id), Lifecycle::Tracking(handle)) => {
                handle.job_id() == id && !handle.status().is_terminal()
            }
            _ => false,
        }
    }

    /// Starts a new submission, orphaning whatever was in flight.
    pub(crate) fn begin_submission(&mut self, endpoint: Endpoint, path: String) -> Ticket {
        self.generation += 1;
        self.endpoint = endpoint;
        self.path = path;
        self.lifecycle = Lifecycle::Submitting;
        self.listing.clear();
        self.error = None;
        self.mark_dirty();
        self.ticket()
    }

    pub(crate) fn accept_job(&mut self, job_id: JobId) {
        self.lifecycle = Lifecycle::Tracking(JobHandle::new(job_id, self.policy.attempt_budget));
        self.mark_dirty();
    }

    pub(crate) fn reject_submission(&mut self, error: ControllerError) {
        self.lifecycle = Lifecycle::Rejected;
        self.fail(error);
    }

    pub(crate) fn handle_mut(&mut self) -> Option<&mut JobHandle> {
        match &mut self.lifecycle {
            Lifecycle::Tracking(handle) => Some(handle),
            _ => None,
        }
    }

    pub(crate) fn complete(&mut self, listing: Vec<ListingEntry>) {
        if let Some(handle) = self.handle_mut() {
            handle.finish(JobStatus::Done);
        }
        self.listing = listing;
        self.error = None;
        self.mark_dirty();
    }

    pub(crate) fn fail(&mut self, error: ControllerError) {
        self.error = Some(error);
        self.mark_dirty();
    }

    /// Drops the current job without contacting the backend.
    pub(crate) fn abandon(&mut self) {
        self.generation += 1;
        self.lifecycle = Lifecycle::Idle;
        self.listing.clear();
        self.mark_dirty();
    }
}
