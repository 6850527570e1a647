use std::fs;
use std::io::Write;
use std::path::Path;

use browser_core::{Endpoint, PanelView};
use browser_logging::{browser_error, browser_info, browser_warn};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

const SESSION_FILENAME: &str = ".browser_session.ron";

/// Where a panel was last looking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct PersistedPanel {
    pub panel: u64,
    pub site: String,
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PersistedSession {
    panels: Vec<PersistedPanel>,
}

pub(crate) fn load_session(dir: &Path) -> Vec<PersistedPanel> {
    let path = dir.join(SESSION_FILENAME);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Vec::new();
        }
        Err(err) => {
            browser_warn!("Failed to read session from {:?}: {}", path, err);
            return Vec::new();
        }
    };

    match ron::from_str::<PersistedSession>(&content) {
        Ok(session) => {
            browser_info!("Loaded session from {:?}", path);
            session.panels
        }
        Err(err) => {
            browser_warn!("Failed to parse session from {:?}: {}", path, err);
            Vec::new()
        }
    }
}

/// Saves every panel that has an endpoint. Panels without one are not worth restoring.
pub(crate) fn save_session(dir: &Path, views: &[PanelView]) {
    let session = PersistedSession {
        panels: views
            .iter()
            .filter_map(|view| match &view.endpoint {
                Endpoint::Site(site) => Some(PersistedPanel {
                    panel: view.panel.0,
                    site: site.clone(),
                    path: view.path.clone(),
                }),
                Endpoint::Unselected => None,
            })
            .collect(),
    };

    let pretty = ron::ser::PrettyConfig::new();
    let content = match ron::ser::to_string_pretty(&session, pretty) {
        Ok(text) => text,
        Err(err) => {
            browser_error!("Failed to serialize session: {}", err);
            return;
        }
    };

    if let Err(err) = write_atomically(dir, SESSION_FILENAME, &content) {
        browser_error!("Failed to write session to {:?}: {}", dir, err);
    }
}

fn write_atomically(dir: &Path, filename: &str, content: &str) -> std::io::Result<()> {
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;
    tmp.persist(dir.join(filename))
        .map_err(|err| err.error)?;
    Ok(())
}
