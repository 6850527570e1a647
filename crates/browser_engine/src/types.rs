use std::fmt;

use serde::Deserialize;
use thiserror::Error;

/// Correlates a submission and its poll chain with the panel that started it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PollKey {
    pub panel: u64,
    pub generation: u64,
}

impl fmt::Display for PollKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "panel#{}/gen{}", self.panel, self.generation)
    }
}

/// Body of `GET /status`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatusPayload {
    pub status: String,
    #[serde(default, alias = "listings")]
    pub listing: Vec<WireEntry>,
}

/// One listing row as the backend sends it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WireEntry {
    pub name: String,
    #[serde(default)]
    pub is_directory: bool,
    #[serde(default)]
    pub permissions: Option<String>,
    #[serde(default)]
    pub nlinks: Option<u64>,
    #[serde(default)]
    pub userid: u32,
    #[serde(default)]
    pub groupid: u32,
    #[serde(default, deserialize_with = "crate::decode::lenient_u64")]
    pub size: u64,
    #[serde(default, deserialize_with = "crate::decode::lenient_i64")]
    pub datestamp: i64,
}

/// Entry of `GET /sites`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SiteInfo {
    pub site_name: String,
    #[serde(default)]
    pub site_desc: Option<String>,
}

/// Parameters of `GET /copy`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyOrder {
    pub source_site: String,
    pub source_path: String,
    pub dest_site: String,
    pub dest_dir_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    JobSubmitted {
        key: PollKey,
        result: Result<String, TransportError>,
    },
    StatusPolled {
        key: PollKey,
        job_id: String,
        result: Result<StatusPayload, TransportError>,
    },
    CopyCompleted {
        order: CopyOrder,
        result: Result<String, TransportError>,
    },
    SitesListed {
        result: Result<Vec<SiteInfo>, TransportError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct TransportError {
    pub kind: FailureKind,
    pub message: String,
}

impl TransportError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64 },
    Decode,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes } => {
                write!(f, "response larger than {max_bytes} bytes")
            }
            FailureKind::Decode => write!(f, "undecodable response"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
