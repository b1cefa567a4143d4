//! otio-rv Session
//!
//! The output side of the adapter: an RV session graph and its writer.
//!
//! # Layout
//!
//! ```text
//! Session ── new_node(kind, name) ──► NodeId
//!    │
//!    ├── Stack    ─┐
//!    ├── Sequence ─┼── inputs (ordered NodeIds)
//!    └── Source   ─┘   cut in/out, fps, media, custom properties
//!    │
//!    ▼
//! GTO objects ──► GTOa text ──► session.rv
//! ```

use std::path::PathBuf;

pub mod gto;
pub mod node;
pub mod session;

pub use gto::{GtoObject, GtoType, PropertyValue};
pub use node::*;
pub use session::*;

/// Errors raised while building or writing a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("No node {0} in session")]
    UnknownNode(NodeId),

    #[error("Node {0} cannot be its own input")]
    SelfInput(NodeId),

    #[error("Node {node} is a {kind} node, not a source")]
    NotASource { node: NodeId, kind: NodeKind },

    #[error("Node {node} has no member named {member:?}")]
    UnknownMember { node: NodeId, member: String },

    #[error("I/O error writing session to {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
