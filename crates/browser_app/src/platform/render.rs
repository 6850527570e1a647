use browser_core::{CopyVerdict, ListingEntry, PanelView};
use browser_engine::SiteInfo;
use chrono::DateTime;

use super::commands::panel_name;

/// Status line plus, for a finished job, the listing table.
pub fn panel(view: &PanelView) -> String {
    let mut out = format!("{}: {}", panel_name(view.panel), view.status_line());
    if view.has_listing() {
        for entry in &view.entries {
            out.push('\n');
            out.push_str(&row(entry));
        }
    }
    out
}

fn row(entry: &ListingEntry) -> String {
    let permissions = entry
        .permissions
        .clone()
        .unwrap_or_else(|| if entry.is_directory { "d" } else { "-" }.to_string());
    let name = if entry.is_directory {
        format!("{}/", entry.name)
    } else {
        entry.name.clone()
    };
    format!(
        "  {:<11} {:>3} {:>6} {:>6} {:>12} {} {}",
        permissions,
        entry
            .link_count
            .map(|count| count.to_string())
            .unwrap_or_default(),
        entry.owner_id,
        entry.group_id,
        entry.size_bytes,
        timestamp(entry.modified_at),
        name
    )
}

fn timestamp(unix_seconds: i64) -> String {
    DateTime::from_timestamp(unix_seconds, 0)
        .map(|time| time.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| unix_seconds.to_string())
}

pub fn sites(sites: &[SiteInfo]) -> String {
    if sites.is_empty() {
        return "no endpoints available".to_string();
    }
    sites
        .iter()
        .map(|site| match &site.site_desc {
            Some(desc) => format!("  {} - {}", site.site_name, desc),
            None => format!("  {}", site.site_name),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn verdict(verdict: &CopyVerdict) -> String {
    if verdict.allowed {
        "copy allowed".to_string()
    } else {
        format!("copy not allowed: {}", verdict.reason)
    }
}
