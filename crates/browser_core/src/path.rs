//! Path arithmetic for directory navigation.
//!
//! Everything here is pure string manipulation on slash-separated remote
//! paths; nothing touches the local filesystem.

use percent_encoding::percent_decode_str;

pub const ROOT: &str = "/";

/// Aliases for the home directory. Their parent is the root.
pub const HOME_ALIASES: [&str; 2] = ["~", "/~"];

/// Decode percent escapes, collapse repeated slashes, drop trailing slashes.
///
/// An empty result becomes the root path.
pub fn normalize(raw: &str) -> String {
    let decoded = percent_decode_str(raw).decode_utf8_lossy();
    tidy(&decoded)
}

/// Like [`normalize`] but for a path that was already decoded once.
///
/// Percent sequences are kept literally, so a directory named `a%20b`
/// stays `a%20b`.
pub fn tidy(path: &str) -> String {
    let collapsed = collapse_slashes(path);
    let trimmed = collapsed.trim_end_matches('/');
    if trimmed.is_empty() {
        ROOT.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Join `child` onto `current` without doubling the separator.
///
/// Only slash runs are collapsed; the inputs are not decoded again.
pub fn descend(current: &str, child: &str) -> String {
    collapse_slashes(&format!("{current}/{child}"))
}

/// Parent directory of `path`. Never goes above the root.
pub fn parent_of(path: &str) -> String {
    parent_of_tidy(normalize(path))
}

/// Parent of an already decoded path; see [`tidy`].
pub fn parent_of_decoded(path: &str) -> String {
    parent_of_tidy(tidy(path))
}

fn parent_of_tidy(normalized: String) -> String {
    if is_root(&normalized) || HOME_ALIASES.contains(&normalized.as_str()) {
        return ROOT.to_string();
    }

    let mut segments: Vec<&str> = normalized.split('/').collect();
    if let Some(last) = segments.iter().rposition(|segment| !segment.is_empty()) {
        segments.truncate(last);
    }
    let parent = segments.join("/");
    if parent.is_empty() {
        ROOT.to_string()
    } else {
        parent
    }
}

pub fn is_root(path: &str) -> bool {
    path == ROOT
}

fn collapse_slashes(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut previous_slash = false;
    for ch in path.chars() {
        if ch == '/' {
            if previous_slash {
                continue;
            }
            previous_slash = true;
        } else {
            previous_slash = false;
        }
        out.push(ch);
    }
    out
}
