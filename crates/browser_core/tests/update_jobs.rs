use std::sync::Once;
use std::time::Duration;

use browser_core::{
    update, BackendStatus, ControllerError, Effect, Endpoint, JobId, JobReport, JobStatus,
    ListingEntry, Msg, PanelId, PanelState, PollPolicy, Ticket, DEFAULT_POLL_DELAY,
    UNSELECTED_ENDPOINT_LABEL,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(browser_logging::initialize_for_tests);
}

fn site(name: &str) -> Endpoint {
    Endpoint::Site(name.to_string())
}

fn list(state: PanelState, endpoint: Endpoint, path: &str) -> (PanelState, Vec<Effect>) {
    update(
        state,
        Msg::ListRequested {
            endpoint,
            path: path.to_string(),
        },
    )
}

/// Submits a listing and lets the backend accept it as `job`.
fn accepted(state: PanelState, path: &str, job: &str) -> (PanelState, Ticket) {
    let (state, _) = list(state, site("A"), path);
    let ticket = state.ticket();
    let (state, _) = update(
        state,
        Msg::JobAccepted {
            ticket,
            job_id: JobId::new(job),
        },
    );
    (state, ticket)
}

fn poll(state: PanelState, ticket: Ticket, job: &str, report: JobReport) -> (PanelState, Vec<Effect>) {
    update(
        state,
        Msg::PollCompleted {
            ticket,
            job_id: JobId::new(job),
            report,
        },
    )
}

fn report(status: BackendStatus, listing: Vec<ListingEntry>) -> JobReport {
    JobReport { status, listing }
}

fn entry(name: &str, is_directory: bool, size_bytes: u64) -> ListingEntry {
    ListingEntry {
        name: name.to_string(),
        is_directory,
        owner_id: 1,
        group_id: 1,
        size_bytes,
        modified_at: 1_700_000_000,
        permissions: None,
        link_count: None,
    }
}

#[test]
fn submit_emits_list_effect_with_normalized_path() {
    init_logging();
    let (state, effects) = list(PanelState::new(PanelId(1)), site("A"), "/home//user/");

    assert_eq!(state.status(), JobStatus::Submitting);
    assert_eq!(state.path(), "/home/user");
    assert_eq!(
        effects,
        vec![Effect::SubmitListing {
            ticket: state.ticket(),
            site: "A".to_string(),
            path: "/home/user".to_string(),
        }]
    );
}

#[test]
fn unselected_endpoint_makes_no_request() {
    init_logging();
    let (state, effects) = list(
        PanelState::new(PanelId(1)),
        Endpoint::from_label(UNSELECTED_ENDPOINT_LABEL),
        "/home",
    );

    assert!(effects.is_empty());
    assert_eq!(state.status(), JobStatus::Idle);
    assert_eq!(state.error(), Some(&ControllerError::Selection));
    assert!(state.job().is_none());
}

#[test]
fn accepted_job_schedules_first_poll_with_full_budget() {
    init_logging();
    let (state, _) = list(PanelState::new(PanelId(1)), site("A"), "/");
    let ticket = state.ticket();
    let (state, effects) = update(
        state,
        Msg::JobAccepted {
            ticket,
            job_id: JobId::new("42"),
        },
    );

    assert_eq!(state.status(), JobStatus::Polling);
    assert_eq!(state.job().map(|h| h.attempts_remaining()), Some(10));
    assert_eq!(
        effects,
        vec![Effect::SchedulePoll {
            ticket,
            job_id: JobId::new("42"),
            delay: DEFAULT_POLL_DELAY,
        }]
    );
}

#[test]
fn submit_transport_failure_is_terminal() {
    init_logging();
    let (state, _) = list(PanelState::new(PanelId(1)), site("A"), "/");
    let ticket = state.ticket();
    let (state, effects) = update(
        state,
        Msg::SubmitFailed {
            ticket,
            message: "connection refused".to_string(),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.status(), JobStatus::Failed);
    assert_eq!(
        state.error(),
        Some(&ControllerError::Transport("connection refused".to_string()))
    );
}

#[test]
fn done_on_first_poll_exposes_listing_unchanged() {
    init_logging();
    let (state, ticket) = accepted(PanelState::new(PanelId(1)), "/data", "7");
    let listing = vec![entry("z.bin", false, 99), entry("a", true, 0), entry("m.txt", false, 3)];

    let (state, effects) = poll(state, ticket, "7", report(BackendStatus::Done, listing.clone()));

    assert!(effects.is_empty());
    assert_eq!(state.status(), JobStatus::Done);
    assert_eq!(state.listing(), listing.as_slice());
    assert_eq!(state.job().map(|h| h.attempts_remaining()), Some(10));
    assert!(state.error().is_none());
}

#[test]
fn ten_pending_polls_end_stuck_without_an_eleventh() {
    init_logging();
    let (mut state, ticket) = accepted(PanelState::new(PanelId(1)), "/", "9");

    for round in 1..=10u32 {
        let (next, effects) = poll(state, ticket, "9", JobReport::pending());
        state = next;
        if round < 10 {
            assert_eq!(state.status(), JobStatus::Polling, "round {round}");
            assert_eq!(effects.len(), 1, "round {round}");
        } else {
            assert!(effects.is_empty(), "no eleventh poll");
        }
    }

    assert_eq!(state.status(), JobStatus::Stuck);
    assert_eq!(state.job().map(|h| h.attempts_remaining()), Some(0));
    assert_eq!(
        state.error(),
        Some(&ControllerError::PollExhausted { attempts: 10 })
    );
    assert!(state.view().status_line().contains("gave up"));
}

#[test]
fn unknown_status_counts_as_still_working() {
    init_logging();
    let (state, ticket) = accepted(PanelState::new(PanelId(1)), "/", "9");

    let (state, effects) = poll(
        state,
        ticket,
        "9",
        report(BackendStatus::parse("RUNNING"), Vec::new()),
    );

    assert_eq!(state.status(), JobStatus::Polling);
    assert_eq!(state.job().map(|h| h.attempts_remaining()), Some(9));
    assert_eq!(effects.len(), 1);
}

#[test]
fn backend_failure_stops_polling() {
    init_logging();
    let (state, ticket) = accepted(PanelState::new(PanelId(1)), "/", "5");

    let (state, effects) = poll(state, ticket, "5", report(BackendStatus::Failed, Vec::new()));

    assert!(effects.is_empty());
    assert_eq!(state.status(), JobStatus::Failed);
    assert_eq!(
        state.error(),
        Some(&ControllerError::JobFailed {
            job_id: JobId::new("5")
        })
    );
}

#[test]
fn poll_transport_failure_is_not_retried() {
    init_logging();
    let (state, ticket) = accepted(PanelState::new(PanelId(1)), "/", "5");

    let (state, effects) = update(
        state,
        Msg::PollFailed {
            ticket,
            job_id: JobId::new("5"),
            message: "timeout".to_string(),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.status(), JobStatus::Failed);
    assert!(matches!(state.error(), Some(ControllerError::Transport(_))));
}

#[test]
fn terminal_job_ignores_further_results() {
    init_logging();
    let (state, ticket) = accepted(PanelState::new(PanelId(1)), "/", "5");
    let (state, _) = poll(state, ticket, "5", report(BackendStatus::Done, vec![entry("a", false, 1)]));

    let (state, effects) = poll(state, ticket, "5", JobReport::pending());

    assert!(effects.is_empty());
    assert_eq!(state.status(), JobStatus::Done);
    assert_eq!(state.job().map(|h| h.attempts_remaining()), Some(10));
}

#[test]
fn end_to_end_pending_pending_done() {
    init_logging();
    let (state, effects) = list(PanelState::new(PanelId(3)), site("A"), "/home//user/");
    let ticket = state.ticket();
    assert_eq!(
        effects,
        vec![Effect::SubmitListing {
            ticket,
            site: "A".to_string(),
            path: "/home/user".to_string(),
        }]
    );

    let (state, _) = update(
        state,
        Msg::JobAccepted {
            ticket,
            job_id: JobId::new("job-1"),
        },
    );
    let (state, _) = poll(state, ticket, "job-1", JobReport::pending());
    let (state, _) = poll(state, ticket, "job-1", JobReport::pending());
    let listing = vec![ListingEntry {
        name: "a.txt".to_string(),
        is_directory: false,
        owner_id: 1,
        group_id: 1,
        size_bytes: 10,
        modified_at: 1_700_000_000,
        permissions: None,
        link_count: None,
    }];
    let (state, effects) = poll(state, ticket, "job-1", report(BackendStatus::Done, listing.clone()));

    assert!(effects.is_empty());
    assert_eq!(state.status(), JobStatus::Done);
    assert_eq!(state.listing(), listing.as_slice());
    assert_eq!(state.job().map(|h| h.attempts_remaining()), Some(8));
}

#[test]
fn custom_policy_controls_budget_and_delay() {
    init_logging();
    let policy = PollPolicy {
        attempt_budget: 2,
        delay: Duration::from_millis(250),
    };
    let (state, _) = list(PanelState::with_policy(PanelId(1), policy), site("A"), "/");
    let ticket = state.ticket();
    let (state, effects) = update(
        state,
        Msg::JobAccepted {
            ticket,
            job_id: JobId::new("1"),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::SchedulePoll {
            ticket,
            job_id: JobId::new("1"),
            delay: Duration::from_millis(250),
        }]
    );

    let (state, effects) = poll(state, ticket, "1", JobReport::pending());
    assert_eq!(effects.len(), 1);
    let (state, effects) = poll(state, ticket, "1", JobReport::pending());
    assert!(effects.is_empty());
    assert_eq!(state.status(), JobStatus::Stuck);
}
