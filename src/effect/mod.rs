//! Effect definition tree.
//!
//! - [`EffectDescriptor`] / [`EmitterDescriptor`] - The built tree
//! - [`build_effect`] / [`build_emitter`] - Mutually recursive construction from a document

mod builder;
mod descriptor;

pub use builder::{
    build_effect, build_emitter, collect_curves, BuildContext, OverridableField, EFFECT_TAG, EMITTER_TAG,
};
pub use descriptor::{AnimationProperties, EffectDescriptor, EmitterDescriptor};
