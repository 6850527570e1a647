use crate::{ControllerError, Endpoint, JobId, JobStatus, ListingEntry, PanelId};

/// Immutable snapshot of one panel.
///
/// Renderers draw from it and the copy coordinator reasons about it; neither
/// holds on to the controller itself.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PanelView {
    pub panel: PanelId,
    pub endpoint: Endpoint,
    pub path: String,
    pub status: JobStatus,
    pub job_id: Option<JobId>,
    pub attempts_remaining: Option<u32>,
    pub entries: Vec<ListingEntry>,
    pub error: Option<ControllerError>,
    pub dirty: bool,
}

impl PanelView {
    pub fn has_listing(&self) -> bool {
        self.status == JobStatus::Done
    }

    /// One-line status for the UI, including the failure reason if any.
    pub fn status_line(&self) -> String {
        let mut line = format!(
            "[{}] {}:{} {}",
            self.panel,
            self.endpoint.label(),
            self.path,
            self.status.label()
        );
        match self.status {
            JobStatus::Polling => {
                if let Some(attempts) = self.attempts_remaining {
                    line.push_str(&format!(" ({attempts} polls left)"));
                }
            }
            JobStatus::Done => {
                line.push_str(&format!(" ({} entries)", self.entries.len()));
            }
            _ => {}
        }
        if let Some(error) = &self.error {
            line.push_str(&format!(": {error}"));
        }
        line
    }
}
