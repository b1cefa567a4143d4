//! Timeline object graph: timelines, stacks, tracks, clips, gaps, and
//! media references.
//!
//! Containers own their children in order. Nothing here knows about the
//! output format.

use serde::{Deserialize, Serialize};

use crate::time::{RationalTime, TimeRange};

/// Arbitrary user metadata attached to any object, kept in document order.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// One node of a timeline document.
#[derive(Debug, Clone, PartialEq)]
pub enum Composable {
    Timeline(Timeline),
    Stack(Stack),
    Track(Track),
    Clip(Clip),
    Gap(Gap),
    /// A schema the model reads but has no structure for (transitions,
    /// collections, effects, ...).
    Unsupported(UnsupportedObject),
}

impl Composable {
    /// The `OTIO_SCHEMA` name this node was read as.
    pub fn schema_name(&self) -> &str {
        match self {
            Composable::Timeline(_) => "Timeline",
            Composable::Stack(_) => "Stack",
            Composable::Track(_) => "Track",
            Composable::Clip(_) => "Clip",
            Composable::Gap(_) => "Gap",
            Composable::Unsupported(other) => &other.schema,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Composable::Timeline(t) => &t.name,
            Composable::Stack(s) => &s.name,
            Composable::Track(t) => &t.name,
            Composable::Clip(c) => &c.name,
            Composable::Gap(g) => &g.name,
            Composable::Unsupported(other) => &other.name,
        }
    }
}

/// Top-level wrapper around a single stack of tracks.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Timeline {
    pub name: String,
    pub metadata: Metadata,
    pub global_start_time: Option<RationalTime>,
    pub tracks: Stack,
}

/// Children composited on top of each other.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Stack {
    pub name: String,
    pub metadata: Metadata,
    pub source_range: Option<TimeRange>,
    pub children: Vec<Composable>,
}

/// Track flavour as recorded in the document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TrackKind {
    #[default]
    Video,
    Audio,
    Other(String),
}

impl TrackKind {
    pub fn parse(kind: &str) -> Self {
        match kind {
            "Video" => TrackKind::Video,
            "Audio" => TrackKind::Audio,
            other => TrackKind::Other(other.to_string()),
        }
    }
}

/// Children played one after another.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Track {
    pub name: String,
    pub kind: TrackKind,
    pub metadata: Metadata,
    pub source_range: Option<TimeRange>,
    pub children: Vec<Composable>,
}

/// A cut of some media.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Clip {
    pub name: String,
    pub metadata: Metadata,
    /// The part of the media that is cut in.
    pub source_range: Option<TimeRange>,
    pub media_reference: Option<MediaReference>,
}

/// Empty space in a track.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Gap {
    pub name: String,
    pub metadata: Metadata,
    pub source_range: Option<TimeRange>,
    /// Only present when the document spells one out.
    pub available_range: Option<TimeRange>,
}

/// Where a clip's media lives.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaReference {
    External {
        target_url: String,
        available_range: Option<TimeRange>,
    },
    Generator {
        generator_kind: String,
        parameters: Metadata,
        available_range: Option<TimeRange>,
    },
    Missing {
        available_range: Option<TimeRange>,
    },
    Other {
        schema: String,
        available_range: Option<TimeRange>,
    },
}

impl MediaReference {
    pub fn available_range(&self) -> Option<TimeRange> {
        match self {
            MediaReference::External {
                available_range, ..
            }
            | MediaReference::Generator {
                available_range, ..
            }
            | MediaReference::Missing { available_range }
            | MediaReference::Other {
                available_range, ..
            } => *available_range,
        }
    }

    /// The target URL when the media is an external file.
    pub fn target_url(&self) -> Option<&str> {
        match self {
            MediaReference::External { target_url, .. } => Some(target_url),
            _ => None,
        }
    }
}

/// A node with a schema the model has no type for.
#[derive(Debug, Clone, PartialEq)]
pub struct UnsupportedObject {
    pub schema: String,
    pub name: String,
}

/// Common read interface of clips and gaps.
pub trait Item {
    fn name(&self) -> &str;
    fn metadata(&self) -> &Metadata;
    fn source_range(&self) -> Option<TimeRange>;
    fn available_range(&self) -> Option<TimeRange>;
}

impl Item for Clip {
    fn name(&self) -> &str {
        &self.name
    }

    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn source_range(&self) -> Option<TimeRange> {
        self.source_range
    }

    /// All of the media that could be cut in.
    fn available_range(&self) -> Option<TimeRange> {
        self.media_reference
            .as_ref()
            .and_then(MediaReference::available_range)
    }
}

impl Item for Gap {
    fn name(&self) -> &str {
        &self.name
    }

    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn source_range(&self) -> Option<TimeRange> {
        self.source_range
    }

    fn available_range(&self) -> Option<TimeRange> {
        self.available_range
    }
}
