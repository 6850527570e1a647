use browser_core::{Endpoint, Msg, PanelId};

use super::error::CommandError;

pub const LEFT: PanelId = PanelId(1);
pub const RIGHT: PanelId = PanelId(2);

/// One line typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A message for one panel's controller.
    Panel { panel: PanelId, msg: Msg },
    /// Print the panel's current snapshot.
    Show { panel: PanelId },
    /// Check copy preconditions for the given selection without copying.
    CheckCopy {
        source: PanelId,
        target: PanelId,
        selection: Vec<String>,
    },
    Copy {
        source: PanelId,
        target: PanelId,
        entry: String,
    },
    Sites,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  sites                         list selectable endpoints
  <panel> list <site> [path]    list a directory (panel is left or right)
  <panel> cd <name>             open a subdirectory
  <panel> up                    go to the parent directory
  <panel> refresh               list the current directory again
  <panel> cancel                stop waiting for the current job
  <panel> show                  print the panel
  check <from> <to> [names...]  check whether a copy would be allowed
  copy <from> <to> <name>       copy one entry into the other panel's directory
  quit";

pub fn parse_panel(word: &str) -> Result<PanelId, CommandError> {
    match word.to_ascii_lowercase().as_str() {
        "left" | "l" => Ok(LEFT),
        "right" | "r" => Ok(RIGHT),
        _ => Err(CommandError::UnknownPanel(word.to_string())),
    }
}

pub fn panel_name(panel: PanelId) -> &'static str {
    if panel == LEFT {
        "left"
    } else if panel == RIGHT {
        "right"
    } else {
        "?"
    }
}

pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let mut words = line.split_whitespace();
    let first = words.next().ok_or(CommandError::Empty)?;

    match first.to_ascii_lowercase().as_str() {
        "quit" | "exit" | "q" => return Ok(Command::Quit),
        "help" | "?" => return Ok(Command::Help),
        "sites" => return Ok(Command::Sites),
        "check" => {
            let source = parse_panel(words.next().ok_or(CommandError::MissingArgument("source panel"))?)?;
            let target = parse_panel(words.next().ok_or(CommandError::MissingArgument("target panel"))?)?;
            return Ok(Command::CheckCopy {
                source,
                target,
                selection: words.map(str::to_string).collect(),
            });
        }
        "copy" => {
            let source = parse_panel(words.next().ok_or(CommandError::MissingArgument("source panel"))?)?;
            let target = parse_panel(words.next().ok_or(CommandError::MissingArgument("target panel"))?)?;
            let entry = rest(words).ok_or(CommandError::MissingArgument("entry name"))?;
            return Ok(Command::Copy {
                source,
                target,
                entry,
            });
        }
        _ => {}
    }

    let panel = parse_panel(first)?;
    let verb = words.next().ok_or(CommandError::MissingArgument("command"))?;
    let msg = match verb.to_ascii_lowercase().as_str() {
        "list" | "ls" => {
            let site = words.next().ok_or(CommandError::MissingArgument("site"))?;
            let path = rest(words).unwrap_or_else(|| "/".to_string());
            Msg::ListRequested {
                endpoint: Endpoint::from_label(site),
                path,
            }
        }
        "cd" => Msg::DescendRequested {
            child: rest(words).ok_or(CommandError::MissingArgument("directory name"))?,
        },
        "up" | ".." => Msg::ParentRequested,
        "refresh" => Msg::RefreshRequested,
        "cancel" => Msg::CancelRequested,
        "show" => return Ok(Command::Show { panel }),
        other => return Err(CommandError::UnknownCommand(other.to_string())),
    };
    Ok(Command::Panel { panel, msg })
}

/// Remaining words joined by single spaces, so names with spaces survive.
fn rest<'a>(words: impl Iterator<Item = &'a str>) -> Option<String> {
    let joined = words.collect::<Vec<_>>().join(" ");
    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}
