//! Browser engine: backend HTTP client and poll scheduling.
mod client;
mod decode;
mod engine;
mod scheduler;
mod types;

pub use client::{ApiSettings, ListingApi, ReqwestListingApi};
pub use decode::{decode_job_id, decode_sites, decode_status};
pub use engine::EngineHandle;
pub use scheduler::{PollRegistry, PollTask};
pub use types::{
    CopyOrder, EngineEvent, FailureKind, PollKey, SiteInfo, StatusPayload, TransportError,
    WireEntry,
};
