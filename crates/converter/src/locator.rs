//! Media locators for source nodes.
//!
//! Items with an external file use its URL. Everything else gets a
//! procedural `.movieproc` locator that RV renders on the fly.

use otio_rv_timeline_model::{MediaReference, TimeRange};

/// Procedural generator used when an item has no external media.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// Black frames, used for gaps.
    Blank,
    /// SMPTE colour bars, used for clips without a file.
    SmpteBars,
}

impl Placeholder {
    pub fn as_str(self) -> &'static str {
        match self {
            Placeholder::Blank => "blank",
            Placeholder::SmpteBars => "smptebars",
        }
    }
}

/// Build the `.movieproc` locator for `range`.
///
/// Start and end are the range's own values, not rescaled to the
/// duration's rate; only the cut points on the node are rescaled.
pub fn movieproc_locator(kind: Placeholder, range: &TimeRange) -> String {
    format!(
        "{},start={},end={},fps={}.movieproc",
        kind.as_str(),
        range.start_time.value,
        range.end_time_exclusive().value,
        range.duration.rate
    )
}

/// The locator for an item: the external URL when there is one,
/// otherwise a placeholder.
pub fn media_locator(
    reference: Option<&MediaReference>,
    placeholder: Placeholder,
    range: &TimeRange,
) -> String {
    match reference.and_then(MediaReference::target_url) {
        Some(url) => url.to_string(),
        None => movieproc_locator(placeholder, range),
    }
}
