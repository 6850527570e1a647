use browser_logging::{browser_debug, browser_info, browser_warn};

use crate::path::{descend, normalize, parent_of_decoded, tidy};
use crate::{
    BackendStatus, ControllerError, Effect, Endpoint, JobId, JobReport, JobStatus, Msg,
    PanelState, Ticket,
};

/// Pure update function: applies a message to one panel and returns any effects.
pub fn update(mut state: PanelState, msg: Msg) -> (PanelState, Vec<Effect>) {
    let effects = match msg {
        Msg::ListRequested { endpoint, path } => submit(&mut state, endpoint, normalize(&path)),
        Msg::ReopenRequested { endpoint, path } => submit(&mut state, endpoint, tidy(&path)),
        Msg::DescendRequested { child } => {
            let target = tidy(&descend(state.path(), &child));
            let endpoint = state.endpoint().clone();
            submit(&mut state, endpoint, target)
        }
        Msg::ParentRequested => {
            let target = parent_of_decoded(state.path());
            let endpoint = state.endpoint().clone();
            submit(&mut state, endpoint, target)
        }
        Msg::RefreshRequested => {
            let target = state.path().to_string();
            let endpoint = state.endpoint().clone();
            submit(&mut state, endpoint, target)
        }
        Msg::CancelRequested => {
            if state.status().is_in_flight() {
                let ticket = state.ticket();
                state.abandon();
                browser_info!("{ticket} cancelled by user");
                vec![Effect::CancelPolls { ticket }]
            } else {
                Vec::new()
            }
        }
        Msg::JobAccepted { ticket, job_id } => {
            if !state.is_current(ticket, None) {
                browser_debug!("{ticket} ignoring stale job {job_id}");
                return (state, Vec::new());
            }
            browser_info!("{ticket} backend accepted job {job_id}");
            state.accept_job(job_id.clone());
            vec![schedule_poll(&state, ticket, job_id)]
        }
        Msg::SubmitFailed { ticket, message } => {
            if !state.is_current(ticket, None) {
                browser_debug!("{ticket} ignoring stale submit failure: {message}");
                return (state, Vec::new());
            }
            browser_warn!("{ticket} list request failed: {message}");
            state.reject_submission(ControllerError::Transport(message));
            Vec::new()
        }
        Msg::PollCompleted {
            ticket,
            job_id,
            report,
        } => {
            if !state.is_current(ticket, Some(&job_id)) {
                browser_debug!("{ticket} ignoring stale poll result for job {job_id}");
                return (state, Vec::new());
            }
            apply_report(&mut state, ticket, job_id, report)
        }
        Msg::PollFailed {
            ticket,
            job_id,
            message,
        } => {
            if !state.is_current(ticket, Some(&job_id)) {
                browser_debug!("{ticket} ignoring stale poll failure for job {job_id}");
                return (state, Vec::new());
            }
            browser_warn!("{ticket} status request for job {job_id} failed: {message}");
            if let Some(handle) = state.handle_mut() {
                handle.finish(JobStatus::Failed);
            }
            state.fail(ControllerError::Transport(message));
            Vec::new()
        }
    };

    (state, effects)
}

/// Starts a listing of `path`, which must already be in normalized form.
fn submit(state: &mut PanelState, endpoint: Endpoint, path: String) -> Vec<Effect> {
    let Some(site) = endpoint.site().map(str::to_owned) else {
        browser_debug!("{} submit refused: no endpoint selected", state.id());
        state.fail(ControllerError::Selection);
        return Vec::new();
    };

    let mut effects = Vec::with_capacity(2);
    if state.status().is_in_flight() {
        effects.push(Effect::CancelPolls {
            ticket: state.ticket(),
        });
    }

    let ticket = state.begin_submission(endpoint, path.clone());
    browser_info!("{ticket} listing {site}:{path}");
    effects.push(Effect::SubmitListing { ticket, site, path });
    effects
}

fn apply_report(
    state: &mut PanelState,
    ticket: Ticket,
    job_id: JobId,
    report: JobReport,
) -> Vec<Effect> {
    match report.status {
        BackendStatus::Done => {
            browser_info!(
                "{ticket} job {job_id} done with {} entries",
                report.listing.len()
            );
            state.complete(report.listing);
            Vec::new()
        }
        BackendStatus::Failed => {
            browser_warn!("{ticket} backend reported job {job_id} failed");
            if let Some(handle) = state.handle_mut() {
                handle.finish(JobStatus::Failed);
            }
            state.fail(ControllerError::JobFailed { job_id });
            Vec::new()
        }
        BackendStatus::Pending | BackendStatus::Unknown(_) => {
            if let BackendStatus::Unknown(raw) = &report.status {
                browser_debug!("{ticket} job {job_id} reported unknown status {raw:?}");
            }
            let budget = state.policy().attempt_budget;
            let status = match state.handle_mut() {
                Some(handle) => handle.spend_attempt(),
                None => return Vec::new(),
            };
            state.mark_dirty();
            if status == JobStatus::Stuck {
                browser_warn!("{ticket} job {job_id} still unfinished after {budget} polls");
                state.fail(ControllerError::PollExhausted { attempts: budget });
                Vec::new()
            } else {
                browser_debug!("{ticket} job {job_id} still working");
                vec![schedule_poll(state, ticket, job_id)]
            }
        }
    }
}

fn schedule_poll(state: &PanelState, ticket: Ticket, job_id: JobId) -> Effect {
    Effect::SchedulePoll {
        ticket,
        job_id,
        delay: state.policy().delay,
    }
}
