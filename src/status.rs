//! Text for the two status labels drawn by the main loop.

use log::warn;
use opclock_events::SourceKind;

const SOURCE_PREFIX: &str = "Source: ";

/// "Source: NAME". `None` if the string could not be allocated; the label is
/// then left off the screen.
pub fn source_label(kind: SourceKind) -> Option<String> {
    let name = kind.as_str();
    let mut label = String::new();
    if let Err(e) = label.try_reserve_exact(SOURCE_PREFIX.len() + name.len()) {
        warn!("Error allocating event source label: {}", e);
        return None;
    }
    label.push_str(SOURCE_PREFIX);
    label.push_str(name);
    Some(label)
}

#[inline]
pub fn status_label(ok: bool) -> &'static str {
    if ok { "Status: OK" } else { "Status: Fail" }
}
