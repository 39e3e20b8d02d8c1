//! XML backend for effect library documents.
//!
//! - [`XmlSource`] - Document text from memory or a (memory-mapped) file
//! - [`XmlDocument`] / [`XmlNode`] - Parsed tree implementing [`crate::core::DocumentNode`]

mod node;
mod source;

pub use node::{XmlDocument, XmlNode};
pub use source::XmlSource;
