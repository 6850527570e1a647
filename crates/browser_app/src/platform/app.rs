use std::collections::BTreeMap;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::mpsc::{self, TryRecvError};
use std::thread;
use std::time::Duration;

use browser_core::{copy, update, Endpoint, Msg, PanelId, PanelState, PanelView, PollPolicy};
use browser_logging::{browser_info, browser_warn};

use super::commands::{self, parse_command, Command, HELP, LEFT, RIGHT};
use super::config::{self, DEFAULT_CONFIG_FILENAME};
use super::effects::{EffectRunner, Inbound};
use super::error::AppResult;
use super::logging;
use super::persistence::{self, PersistedPanel};
use super::render;

const EVENT_WAIT: Duration = Duration::from_millis(20);

pub fn run_app() -> AppResult<()> {
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILENAME));
    let (config, warnings) = config::load_config(&config_path);
    logging::initialize(config.log_destination, config.level(), &config.log_file);
    config::log_loaded(&config_path, &config, &warnings);

    let runner = EffectRunner::new(config.api_settings())?;
    let mut app = App::new(runner, config.poll_policy());

    let session_dir = std::env::current_dir()?;
    println!("{HELP}");
    app.restore(persistence::load_session(&session_dir));

    let (line_tx, line_rx) = mpsc::channel::<String>();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });

    app.run(&line_rx);
    persistence::save_session(&session_dir, &app.views());
    browser_info!("Session saved, exiting");
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

struct App {
    runner: EffectRunner,
    panels: BTreeMap<PanelId, PanelState>,
}

impl App {
    fn new(runner: EffectRunner, policy: PollPolicy) -> Self {
        let panels = [LEFT, RIGHT]
            .into_iter()
            .map(|id| (id, PanelState::with_policy(id, policy)))
            .collect();
        Self { runner, panels }
    }

    fn views(&self) -> Vec<PanelView> {
        self.panels.values().map(PanelState::view).collect()
    }

    fn view(&self, panel: PanelId) -> Option<PanelView> {
        self.panels.get(&panel).map(PanelState::view)
    }

    fn restore(&mut self, saved: Vec<PersistedPanel>) {
        for entry in saved {
            let panel = PanelId(entry.panel);
            if !self.panels.contains_key(&panel) {
                browser_warn!("Ignoring saved state for unknown {}", panel);
                continue;
            }
            self.dispatch(
                panel,
                Msg::ReopenRequested {
                    endpoint: Endpoint::Site(entry.site),
                    path: entry.path,
                },
            );
        }
    }

    /// Runs until the user quits, or until input ends and no job is left in flight.
    fn run(&mut self, lines: &mpsc::Receiver<String>) {
        let mut input_open = true;
        loop {
            if input_open {
                match lines.try_recv() {
                    Ok(line) => {
                        if self.handle_line(&line) == Flow::Quit {
                            return;
                        }
                    }
                    Err(TryRecvError::Empty) => {}
                    Err(TryRecvError::Disconnected) => input_open = false,
                }
            }

            if let Some(inbound) = self.runner.recv_timeout(EVENT_WAIT) {
                self.handle_inbound(inbound);
            } else if !input_open && !self.any_in_flight() {
                return;
            }
        }
    }

    fn any_in_flight(&self) -> bool {
        self.panels
            .values()
            .any(|state| state.status().is_in_flight())
    }

    fn handle_line(&mut self, line: &str) -> Flow {
        if line.trim().is_empty() {
            return Flow::Continue;
        }
        let command = match parse_command(line) {
            Ok(command) => command,
            Err(err) => {
                println!("{err}");
                return Flow::Continue;
            }
        };

        match command {
            Command::Panel { panel, msg } => self.dispatch(panel, msg),
            Command::Show { panel } => {
                if let Some(view) = self.view(panel) {
                    println!("{}", render::panel(&view));
                }
            }
            Command::CheckCopy {
                source,
                target,
                selection,
            } => {
                if let (Some(source), Some(target)) = (self.view(source), self.view(target)) {
                    let verdict = copy::evaluate(&source, &target, &selection);
                    println!("{}", render::verdict(&verdict));
                }
            }
            Command::Copy {
                source,
                target,
                entry,
            } => self.copy(source, target, &entry),
            Command::Sites => self.runner.list_sites(),
            Command::Help => println!("{HELP}"),
            Command::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    fn dispatch(&mut self, panel: PanelId, msg: Msg) {
        let Some(slot) = self.panels.get_mut(&panel) else {
            browser_warn!("Message for unknown {} dropped", panel);
            return;
        };

        let state = std::mem::take(slot);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        let view = state.view();
        *slot = state;

        self.runner.enqueue(effects);
        if was_dirty {
            println!("{}", render::panel(&view));
        }
    }

    fn copy(&mut self, source: PanelId, target: PanelId, entry: &str) {
        // Fresh snapshots: either panel may have moved since the last check.
        let (Some(source_view), Some(target_view)) = (self.view(source), self.view(target)) else {
            return;
        };
        match copy::execute(&source_view, &target_view, entry) {
            Ok(effect) => {
                println!(
                    "copying {} from {} to {}",
                    entry,
                    commands::panel_name(source),
                    commands::panel_name(target)
                );
                self.runner.enqueue(vec![effect]);
            }
            Err(err) => println!("{err}"),
        }
    }

    fn handle_inbound(&mut self, inbound: Inbound) {
        match inbound {
            Inbound::Panel { panel, msg } => self.dispatch(panel, msg),
            Inbound::CopyFinished { request, result } => match result {
                Ok(_) => println!(
                    "copied {}:{} to {}:{}",
                    request.source_endpoint,
                    request.source_path,
                    request.target_endpoint,
                    request.target_dir_path
                ),
                Err(err) => println!("copy of {} failed: {}", request.source_path, err),
            },
            Inbound::Sites(Ok(sites)) => println!("{}", render::sites(&sites)),
            Inbound::Sites(Err(err)) => println!("could not list endpoints: {err}"),
        }
    }
}
