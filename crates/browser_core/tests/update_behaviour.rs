use std::sync::Once;

use browser_core::{
    update, BackendStatus, ControllerError, Effect, Endpoint, JobId, JobReport, JobStatus,
    ListingEntry, Msg, PanelId, PanelState, Ticket,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(browser_logging::initialize_for_tests);
}

fn listed(path: &str, job: &str) -> (PanelState, Ticket) {
    let (state, _) = update(
        PanelState::new(PanelId(1)),
        Msg::ListRequested {
            endpoint: Endpoint::Site("A".to_string()),
            path: path.to_string(),
        },
    );
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

fn done(state: PanelState, ticket: Ticket, job: &str) -> PanelState {
    let (state, _) = update(
        state,
        Msg::PollCompleted {
            ticket,
            job_id: JobId::new(job),
            report: JobReport {
                status: BackendStatus::Done,
                listing: vec![ListingEntry {
                    name: "sub".to_string(),
                    is_directory: true,
                    owner_id: 0,
                    group_id: 0,
                    size_bytes: 4096,
                    modified_at: 0,
                    permissions: Some("drwxr-xr-x".to_string()),
                    link_count: Some(2),
                }],
            },
        },
    );
    state
}

fn submitted_path(effects: &[Effect]) -> Option<&str> {
    effects.iter().find_map(|effect| match effect {
        Effect::SubmitListing { path, .. } => Some(path.as_str()),
        _ => None,
    })
}

#[test]
fn descend_submits_child_path_on_same_endpoint() {
    init_logging();
    let (state, ticket) = listed("/bin/", "1");
    let state = done(state, ticket, "1");

    let (state, effects) = update(
        state,
        Msg::DescendRequested {
            child: "blah".to_string(),
        },
    );

    assert_eq!(submitted_path(&effects), Some("/bin/blah"));
    assert_eq!(state.endpoint(), &Endpoint::Site("A".to_string()));
    assert_eq!(state.status(), JobStatus::Submitting);
    assert!(state.listing().is_empty());
}

#[test]
fn parent_submits_parent_path() {
    init_logging();
    let (state, ticket) = listed("/bin/blah", "1");
    let state = done(state, ticket, "1");

    let (state, effects) = update(state, Msg::ParentRequested);
    assert_eq!(submitted_path(&effects), Some("/bin"));

    let (_state, effects) = update(state, Msg::ParentRequested);
    assert_eq!(submitted_path(&effects), Some("/"));
}

#[test]
fn parent_of_home_alias_goes_to_root() {
    init_logging();
    let (state, _) = listed("~", "1");
    let (_state, effects) = update(state, Msg::ParentRequested);
    assert_eq!(submitted_path(&effects), Some("/"));
}

#[test]
fn navigation_without_endpoint_is_a_selection_error() {
    init_logging();
    let (state, effects) = update(PanelState::new(PanelId(4)), Msg::ParentRequested);

    assert!(effects.is_empty());
    assert_eq!(state.status(), JobStatus::Idle);
    assert_eq!(state.error(), Some(&ControllerError::Selection));
}

#[test]
fn refresh_retries_a_failed_job_on_the_same_path() {
    init_logging();
    let (state, ticket) = listed("/data", "1");
    let (state, _) = update(
        state,
        Msg::PollCompleted {
            ticket,
            job_id: JobId::new("1"),
            report: JobReport {
                status: BackendStatus::Failed,
                listing: Vec::new(),
            },
        },
    );
    assert_eq!(state.status(), JobStatus::Failed);

    let (state, effects) = update(state, Msg::RefreshRequested);

    assert_eq!(submitted_path(&effects), Some("/data"));
    assert_eq!(state.status(), JobStatus::Submitting);
    assert!(state.error().is_none());
}

#[test]
fn resubmission_orphans_the_previous_chain() {
    init_logging();
    let (state, old_ticket) = listed("/old", "old-job");

    let (state, effects) = update(
        state,
        Msg::ListRequested {
            endpoint: Endpoint::Site("A".to_string()),
            path: "/new".to_string(),
        },
    );
    assert_eq!(effects[0], Effect::CancelPolls { ticket: old_ticket });
    assert_eq!(submitted_path(&effects), Some("/new"));
    let new_ticket = state.ticket();
    assert_ne!(new_ticket, old_ticket);

    // A late answer from the old chain changes nothing.
    let before = state.clone();
    let (state, effects) = update(
        state,
        Msg::PollCompleted {
            ticket: old_ticket,
            job_id: JobId::new("old-job"),
            report: JobReport {
                status: BackendStatus::Done,
                listing: Vec::new(),
            },
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state, before);

    // The fresh chain still wins.
    let (state, _) = update(
        state,
        Msg::JobAccepted {
            ticket: new_ticket,
            job_id: JobId::new("new-job"),
        },
    );
    let state = done(state, new_ticket, "new-job");
    assert_eq!(state.status(), JobStatus::Done);
    assert_eq!(state.path(), "/new");
}

#[test]
fn poll_for_a_different_job_id_is_ignored() {
    init_logging();
    let (state, ticket) = listed("/", "1");
    let (state, effects) = update(
        state,
        Msg::PollFailed {
            ticket,
            job_id: JobId::new("2"),
            message: "boom".to_string(),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.status(), JobStatus::Polling);
}

#[test]
fn cancel_returns_to_idle_and_cancels_polls() {
    init_logging();
    let (state, ticket) = listed("/", "1");

    let (state, effects) = update(state, Msg::CancelRequested);
    assert_eq!(effects, vec![Effect::CancelPolls { ticket }]);
    assert_eq!(state.status(), JobStatus::Idle);

    let (state, effects) = update(
        state,
        Msg::PollCompleted {
            ticket,
            job_id: JobId::new("1"),
            report: JobReport::pending(),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.status(), JobStatus::Idle);
}

#[test]
fn cancel_when_idle_is_noop() {
    init_logging();
    let state = PanelState::new(PanelId(1));
    let (next, effects) = update(state.clone(), Msg::CancelRequested);
    assert!(effects.is_empty());
    assert_eq!(next, state);
}

#[test]
fn dirty_flag_tracks_visible_changes() {
    init_logging();
    let (mut state, ticket) = listed("/", "1");
    assert!(state.consume_dirty());
    assert!(!state.consume_dirty());

    let (mut state, _) = update(
        state,
        Msg::PollCompleted {
            ticket,
            job_id: JobId::new("1"),
            report: JobReport::pending(),
        },
    );
    assert!(state.consume_dirty());
    assert_eq!(state.view().attempts_remaining, Some(9));
}

#[test]
fn descend_keeps_percent_sequences_in_child_names() {
    init_logging();
    let (state, ticket) = listed("/data", "1");
    let state = done(state, ticket, "1");

    let (state, effects) = update(
        state,
        Msg::DescendRequested {
            child: "a%20b".to_string(),
        },
    );

    assert_eq!(submitted_path(&effects), Some("/data/a%20b"));
    assert_eq!(state.path(), "/data/a%20b");
}

#[test]
fn parent_does_not_decode_the_current_path_again() {
    init_logging();
    // One decode on entry leaves a literal "%41" in the first segment.
    let (state, ticket) = listed("/x%2541/y", "1");
    assert_eq!(state.path(), "/x%41/y");
    let state = done(state, ticket, "1");

    let (state, effects) = update(state, Msg::ParentRequested);
    assert_eq!(submitted_path(&effects), Some("/x%41"));

    let (_state, effects) = update(state, Msg::RefreshRequested);
    assert_eq!(submitted_path(&effects), Some("/x%41"));
}

#[test]
fn reopen_lists_a_saved_path_verbatim() {
    init_logging();
    let (state, effects) = update(
        PanelState::new(PanelId(2)),
        Msg::ReopenRequested {
            endpoint: Endpoint::Site("B".to_string()),
            path: "/srv//a%20b/".to_string(),
        },
    );

    assert_eq!(submitted_path(&effects), Some("/srv/a%20b"));
    assert_eq!(state.status(), JobStatus::Submitting);
}

#[test]
fn refused_submit_does_not_taint_the_running_job() {
    init_logging();
    let (state, ticket) = listed("/data", "1");

    let (state, effects) = update(
        state,
        Msg::ListRequested {
            endpoint: Endpoint::Unselected,
            path: "/other".to_string(),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.status(), JobStatus::Polling);
    assert_eq!(state.error(), Some(&ControllerError::Selection));

    let state = done(state, ticket, "1");

    assert_eq!(state.status(), JobStatus::Done);
    assert_eq!(state.path(), "/data");
    assert!(state.error().is_none());
    assert!(!state.view().status_line().contains("no endpoint selected"));
}
