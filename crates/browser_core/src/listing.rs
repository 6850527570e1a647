/// One row of a completed directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    pub is_directory: bool,
    pub owner_id: u32,
    pub group_id: u32,
    pub size_bytes: u64,
    /// Unix seconds.
    pub modified_at: i64,
    pub permissions: Option<String>,
    pub link_count: Option<u64>,
}

/// Job status as reported by the backend.
///
/// The backend's value space is open-ended; anything that is not a known
/// terminal value means the job is still running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendStatus {
    Pending,
    Done,
    Failed,
    Unknown(String),
}

impl BackendStatus {
    pub fn parse(raw: &str) -> Self {
        let value = raw.trim();
        if value.eq_ignore_ascii_case("DONE") {
            BackendStatus::Done
        } else if value.eq_ignore_ascii_case("FAILED") {
            BackendStatus::Failed
        } else if ["PENDING", "NEW", "SUBMITTED"]
            .iter()
            .any(|known| value.eq_ignore_ascii_case(known))
        {
            BackendStatus::Pending
        } else {
            BackendStatus::Unknown(value.to_string())
        }
    }
}

/// Decoded result of a single status poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobReport {
    pub status: BackendStatus,
    pub listing: Vec<ListingEntry>,
}

impl JobReport {
    pub fn pending() -> Self {
        Self {
            status: BackendStatus::Pending,
            listing: Vec::new(),
        }
    }
}
