//! Cross-panel copy gating.
//!
//! Works purely on [`PanelView`] snapshots so the checks can run without
//! borrowing either controller.

use std::fmt;

use crate::path::descend;
use crate::{ControllerError, Effect, PanelView};

/// Outcome of the ordered copy checks. The first failing check wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyCheck {
    Allowed,
    NoEndpointSelected,
    SourceListingUnavailable,
    TargetListingUnavailable,
    WrongSelectionCount,
}

impl fmt::Display for CopyCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            CopyCheck::Allowed => "allowed",
            CopyCheck::NoEndpointSelected => "both panels need an endpoint",
            CopyCheck::SourceListingUnavailable => "source panel has no listing",
            CopyCheck::TargetListingUnavailable => "target panel has no listing",
            CopyCheck::WrongSelectionCount => "select exactly one entry to copy",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyVerdict {
    pub allowed: bool,
    pub reason: CopyCheck,
}

impl From<CopyCheck> for CopyVerdict {
    fn from(reason: CopyCheck) -> Self {
        Self {
            allowed: reason == CopyCheck::Allowed,
            reason,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyRequest {
    pub source_endpoint: String,
    pub source_path: String,
    pub target_endpoint: String,
    pub target_dir_path: String,
}

/// Decides whether the rows selected in `source` may be copied into `target`'s directory.
pub fn evaluate(source: &PanelView, target: &PanelView, selection: &[String]) -> CopyVerdict {
    let reason = if !source.endpoint.is_selected() || !target.endpoint.is_selected() {
        CopyCheck::NoEndpointSelected
    } else if !source.has_listing() {
        CopyCheck::SourceListingUnavailable
    } else if !target.has_listing() {
        CopyCheck::TargetListingUnavailable
    } else if selection.len() != 1 {
        CopyCheck::WrongSelectionCount
    } else {
        CopyCheck::Allowed
    };
    reason.into()
}

/// Re-validates against the given snapshots and builds the copy effect.
///
/// Pass snapshots taken right before the call; a verdict from an earlier
/// `evaluate` may already be stale.
pub fn execute(
    source: &PanelView,
    target: &PanelView,
    selected_entry: &str,
) -> Result<Effect, ControllerError> {
    let selection = [selected_entry.to_string()];
    let verdict = evaluate(source, target, &selection);
    if !verdict.allowed {
        return Err(ControllerError::CopyPrecondition(verdict.reason));
    }

    let (Some(source_site), Some(target_site)) = (source.endpoint.site(), target.endpoint.site())
    else {
        return Err(ControllerError::CopyPrecondition(
            CopyCheck::NoEndpointSelected,
        ));
    };

    Ok(Effect::IssueCopy {
        request: CopyRequest {
            source_endpoint: source_site.to_string(),
            source_path: descend(&source.path, selected_entry),
            target_endpoint: target_site.to_string(),
            target_dir_path: target.path.clone(),
        },
    })
}
