//! # fxlib
//!
//! Loader for particle-effect libraries.
//!
//! A library document holds sprite declarations, folders of effects and
//! top-level effects. Effects contain emitters; emitters carry keyframed
//! attribute curves and may spawn a nested sub-effect. This crate turns
//! such a document into an owned effect-definition tree for a separate
//! simulation runtime.
//!
//! ## Modules
//!
//! - [`util`] - Errors and math re-exports
//! - [`core`] - Document access trait, curves, attribute categories, sprites
//! - [`xml`] - XML document backend
//! - [`effect`] - Effect/emitter descriptors and the tree builder
//! - [`loader`] - Pull-based shape/effect enumeration over one document
//! - [`library`] - Multi-document library with merged sprite indices
//!
//! ## Example
//!
//! ```ignore
//! use fxlib::prelude::*;
//!
//! let mut lib = EffectLibrary::new();
//! lib.load_file("effects.xml", &LoadOptions::default())?;
//!
//! for effect in lib.effects() {
//!     println!("{} ({} emitters)", effect.path, effect.emitters.len());
//! }
//! ```

pub mod util;
pub mod core;
pub mod xml;
pub mod effect;
pub mod loader;
pub mod library;

// Re-export commonly used types
pub use util::{Error, Result};
pub use library::{EffectLibrary, LoadOptions, LoadStats};
pub use loader::EffectLoader;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{Error, Result};
    pub use crate::core::{
        AttributeCurve, AttributeKey, DocumentNode, EffectAttribute, EmitterAttribute, Keyframe,
        SpriteDescriptor, TangentHandle,
    };
    pub use crate::effect::{AnimationProperties, EffectDescriptor, EmitterDescriptor};
    pub use crate::library::{EffectLibrary, LoadOptions, LoadStats};
    pub use crate::loader::{EffectLayout, EffectLoader};
    pub use crate::xml::{XmlDocument, XmlSource};
}
