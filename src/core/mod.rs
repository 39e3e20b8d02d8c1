//! Core layer - document access contract and the data model shared by all loaders.
//!
//! This module provides:
//! - [`DocumentNode`] - Navigation and typed attribute access on a document tree
//! - [`AttributeCurve`] / [`Keyframe`] / [`TangentHandle`] - Keyframed values
//! - [`CurveTable`] - Per-descriptor curves keyed by [`EffectAttribute`] or [`EmitterAttribute`]
//! - [`SpriteDescriptor`] and [`find_sprite`] - Shapes and merged-index lookup

mod attributes;
mod curve;
mod sprite;
mod traits;
pub mod value;

pub use attributes::{EffectAttribute, EmitterAttribute};
pub use curve::{AttributeCurve, AttributeKey, CurveTable, Keyframe, TangentHandle};
pub use sprite::{find_sprite, SpriteDescriptor};
pub use traits::{DocumentNode, NamedSiblings};
