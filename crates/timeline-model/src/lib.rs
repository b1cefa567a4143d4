//! otio-rv Timeline Model
//!
//! The editorial input side of the adapter:
//! - **Time:** rational time values and ranges, each carrying its own rate
//! - **Schema:** timelines, stacks, tracks, clips, gaps, and media references
//! - **Reader:** the `otio_json` interchange encoding
//!
//! The model is read-only from the adapter's point of view. It is built
//! once from a document and walked by the converter.

pub mod reader;
pub mod schema;
pub mod time;

pub use reader::*;
pub use schema::*;
pub use time::*;
