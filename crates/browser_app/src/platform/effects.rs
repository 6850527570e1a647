use std::time::Duration;

use browser_core::{
    BackendStatus, CopyRequest, Effect, JobId, JobReport, ListingEntry, Msg, PanelId, Ticket,
};
use browser_engine::{
    ApiSettings, CopyOrder, EngineEvent, EngineHandle, PollKey, SiteInfo, StatusPayload,
    TransportError, WireEntry,
};
use browser_logging::{browser_debug, browser_info, browser_warn};

/// Something the engine finished, translated for the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Panel { panel: PanelId, msg: Msg },
    CopyFinished {
        request: CopyRequest,
        result: Result<String, TransportError>,
    },
    Sites(Result<Vec<SiteInfo>, TransportError>),
}

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: ApiSettings) -> Result<Self, TransportError> {
        Ok(Self {
            engine: EngineHandle::new(settings)?,
        })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SubmitListing { ticket, site, path } => {
                    browser_info!("SubmitListing {} site={} path={}", ticket, site, path);
                    self.engine.submit_listing(key_for(ticket), site, path);
                }
                Effect::SchedulePoll {
                    ticket,
                    job_id,
                    delay,
                } => {
                    browser_debug!("SchedulePoll {} job={} delay={:?}", ticket, job_id, delay);
                    self.engine
                        .schedule_poll(key_for(ticket), job_id.as_str(), delay);
                }
                Effect::CancelPolls { ticket } => {
                    browser_debug!("CancelPolls {}", ticket);
                    self.engine.cancel_polls(key_for(ticket));
                }
                Effect::IssueCopy { request } => {
                    browser_info!(
                        "IssueCopy {}:{} -> {}:{}",
                        request.source_endpoint,
                        request.source_path,
                        request.target_endpoint,
                        request.target_dir_path
                    );
                    self.engine.copy(order_for(&request));
                }
            }
        }
    }

    pub fn list_sites(&self) {
        self.engine.list_sites();
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<Inbound> {
        self.engine.recv_timeout(timeout).map(map_event)
    }
}

pub(crate) fn map_event(event: EngineEvent) -> Inbound {
    match event {
        EngineEvent::JobSubmitted { key, result } => {
            let ticket = ticket_for(key);
            let msg = match result {
                Ok(job_id) => Msg::JobAccepted {
                    ticket,
                    job_id: JobId::new(job_id),
                },
                Err(err) => Msg::SubmitFailed {
                    ticket,
                    message: err.to_string(),
                },
            };
            Inbound::Panel {
                panel: ticket.panel,
                msg,
            }
        }
        EngineEvent::StatusPolled {
            key,
            job_id,
            result,
        } => {
            let ticket = ticket_for(key);
            let job_id = JobId::new(job_id);
            let msg = match result {
                Ok(payload) => Msg::PollCompleted {
                    ticket,
                    job_id,
                    report: map_report(payload),
                },
                Err(err) => Msg::PollFailed {
                    ticket,
                    job_id,
                    message: err.to_string(),
                },
            };
            Inbound::Panel {
                panel: ticket.panel,
                msg,
            }
        }
        EngineEvent::CopyCompleted { order, result } => {
            if let Err(err) = &result {
                browser_warn!("Copy of {} failed: {}", order.source_path, err);
            }
            Inbound::CopyFinished {
                request: request_for(order),
                result,
            }
        }
        EngineEvent::SitesListed { result } => Inbound::Sites(result),
    }
}

fn key_for(ticket: Ticket) -> PollKey {
    PollKey {
        panel: ticket.panel.0,
        generation: ticket.generation,
    }
}

fn ticket_for(key: PollKey) -> Ticket {
    Ticket {
        panel: PanelId(key.panel),
        generation: key.generation,
    }
}

fn order_for(request: &CopyRequest) -> CopyOrder {
    CopyOrder {
        source_site: request.source_endpoint.clone(),
        source_path: request.source_path.clone(),
        dest_site: request.target_endpoint.clone(),
        dest_dir_path: request.target_dir_path.clone(),
    }
}

fn request_for(order: CopyOrder) -> CopyRequest {
    CopyRequest {
        source_endpoint: order.source_site,
        source_path: order.source_path,
        target_endpoint: order.dest_site,
        target_dir_path: order.dest_dir_path,
    }
}

fn map_report(payload: StatusPayload) -> JobReport {
    JobReport {
        status: BackendStatus::parse(&payload.status),
        listing: payload.listing.into_iter().map(map_entry).collect(),
    }
}

fn map_entry(entry: WireEntry) -> ListingEntry {
    ListingEntry {
        name: entry.name,
        is_directory: entry.is_directory,
        owner_id: entry.userid,
        group_id: entry.groupid,
        size_bytes: entry.size,
        modified_at: entry.datestamp,
        permissions: entry.permissions,
        link_count: entry.nlinks,
    }
}
