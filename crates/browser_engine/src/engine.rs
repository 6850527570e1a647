use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use browser_logging::{browser_debug, browser_error};

use crate::client::{ApiSettings, ListingApi, ReqwestListingApi};
use crate::scheduler::{PollRegistry, PollTask};
use crate::{CopyOrder, EngineEvent, PollKey, TransportError};

enum EngineCommand {
    SubmitListing {
        key: PollKey,
        site: String,
        path: String,
    },
    SchedulePoll {
        key: PollKey,
        job_id: String,
        delay: Duration,
    },
    CancelPolls {
        key: PollKey,
    },
    Copy {
        order: CopyOrder,
    },
    ListSites,
}

/// Runs backend requests on a dedicated tokio runtime and reports results as events.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: ApiSettings) -> Result<Self, TransportError> {
        let api = ReqwestListingApi::new(settings)?;
        Ok(Self::with_api(Arc::new(api)))
    }

    /// Uses any [`ListingApi`] implementation, e.g. a scripted one in tests.
    pub fn with_api(api: Arc<dyn ListingApi>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            let mut polls = PollRegistry::new();
            while let Ok(command) = cmd_rx.recv() {
                dispatch(runtime.handle(), &mut polls, api.clone(), command, event_tx.clone());
            }
            browser_debug!("engine command channel closed");
        });

        Self { cmd_tx, event_rx }
    }

    pub fn submit_listing(&self, key: PollKey, site: impl Into<String>, path: impl Into<String>) {
        self.send(EngineCommand::SubmitListing {
            key,
            site: site.into(),
            path: path.into(),
        });
    }

    pub fn schedule_poll(&self, key: PollKey, job_id: impl Into<String>, delay: Duration) {
        self.send(EngineCommand::SchedulePoll {
            key,
            job_id: job_id.into(),
            delay,
        });
    }

    pub fn cancel_polls(&self, key: PollKey) {
        self.send(EngineCommand::CancelPolls { key });
    }

    pub fn copy(&self, order: CopyOrder) {
        self.send(EngineCommand::Copy { order });
    }

    pub fn list_sites(&self) {
        self.send(EngineCommand::ListSites);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            browser_error!("engine thread is gone; command dropped");
        }
    }
}

fn dispatch(
    runtime: &tokio::runtime::Handle,
    polls: &mut PollRegistry,
    api: Arc<dyn ListingApi>,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::SubmitListing { key, site, path } => {
            runtime.spawn(async move {
                let result = api.submit_listing(&site, &path).await;
                let _ = event_tx.send(EngineEvent::JobSubmitted { key, result });
            });
        }
        EngineCommand::SchedulePoll { key, job_id, delay } => {
            let task = PollTask::spawn(runtime, key, delay, async move {
                let result = api.job_status(&job_id).await;
                let _ = event_tx.send(EngineEvent::StatusPolled {
                    key,
                    job_id,
                    result,
                });
            });
            polls.insert(task);
        }
        EngineCommand::CancelPolls { key } => {
            if polls.cancel(key) {
                browser_debug!("{key} cancelled pending poll");
            }
        }
        EngineCommand::Copy { order } => {
            runtime.spawn(async move {
                let result = api.copy(&order).await;
                let _ = event_tx.send(EngineEvent::CopyCompleted { order, result });
            });
        }
        EngineCommand::ListSites => {
            runtime.spawn(async move {
                let result = api.sites().await;
                let _ = event_tx.send(EngineEvent::SitesListed { result });
            });
        }
    }
}
