//! otio-rv Converter
//!
//! Translates a timeline into an RV session graph:
//!
//! | Timeline node | Session node |
//! |---|---|
//! | Timeline | (its top-level stack) |
//! | Stack | Stack |
//! | Track | Sequence |
//! | Clip | Source (external URL or `smptebars` placeholder) |
//! | Gap | Source (`blank` placeholder) |
//!
//! Anything else is a [`ConvertError::NoMappingForType`].

pub mod locator;
pub mod writer;

pub use locator::*;
pub use writer::*;

use otio_rv_session::SessionError;

/// Fatal conversion errors.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// The timeline contains a node type the session has no equivalent for.
    #[error("No mapping for OTIO type: {schema}")]
    NoMappingForType { schema: String },

    /// A clip or gap has neither a source range nor an available range,
    /// so its duration cannot be computed.
    #[error("No valid range on clip: {item:?}")]
    NoValidRange { item: String },

    #[error("Could not serialize metadata: {0}")]
    Metadata(#[from] serde_json::Error),

    #[error(transparent)]
    Session(#[from] SessionError),
}
