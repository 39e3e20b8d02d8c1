//! Effect and emitter descriptors.
//!
//! The tree is strictly owned top-down: an effect owns its emitters, an
//! emitter owns its optional sub-effect. Upward links are stored as paths
//! and sprites are referenced by merged index, so no descriptor holds a
//! pointer into anything it does not own.

use crate::core::{
    find_sprite, AttributeCurve, CurveTable, EffectAttribute, EmitterAttribute, SpriteDescriptor,
};

/// Animation-sheet export settings of an effect.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnimationProperties {
    pub frames: i32,
    pub width: i32,
    pub height: i32,
    pub x: i32,
    pub y: i32,
    pub seed: i32,
    pub looped: bool,
    pub zoom: f32,
    pub frame_offset: i32,
}

/// A particle effect: global parameters, curves and emitters.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EffectDescriptor {
    /// Effect class (point, area, line, ellipse).
    pub class: i32,
    pub emit_at_points: bool,
    /// Grid columns used when emitting at points.
    pub max_gx: i32,
    /// Grid rows used when emitting at points.
    pub max_gy: i32,
    pub emission_type: i32,
    pub ellipse_arc: f32,
    pub effect_length: i32,
    pub lock_aspect: bool,
    pub name: String,
    pub handle_center: bool,
    pub handle_x: i32,
    pub handle_y: i32,
    pub traverse_edge: bool,
    pub end_behavior: i32,
    pub distance_set_by_life: bool,
    pub reverse_spawn: bool,

    pub animation: Option<AnimationProperties>,

    /// `/`-joined names from the folder or owning emitter down to this effect.
    pub path: String,
    /// Path of the emitter that spawns this effect, `None` at top level.
    pub parent_emitter: Option<String>,

    pub curves: CurveTable<EffectAttribute>,
    pub emitters: Vec<EmitterDescriptor>,
}

impl EffectDescriptor {
    /// Curve of one global attribute.
    #[inline]
    pub fn curve(&self, attr: EffectAttribute) -> &AttributeCurve {
        self.curves.get(attr)
    }

    /// Direct child emitter by name.
    pub fn emitter(&self, name: &str) -> Option<&EmitterDescriptor> {
        self.emitters.iter().find(|e| e.name == name)
    }

    /// Check if this effect is a sub-effect spawned by an emitter.
    #[inline]
    pub fn is_sub_effect(&self) -> bool {
        self.parent_emitter.is_some()
    }

    /// Folder a top-level effect was loaded from, `None` for flat and sub-effects.
    pub fn folder(&self) -> Option<&str> {
        if self.is_sub_effect() {
            return None;
        }
        self.path
            .strip_suffix(self.name.as_str())
            .and_then(|prefix| prefix.strip_suffix('/'))
            .filter(|folder| !folder.is_empty())
    }

    /// Find an effect in this subtree (including itself) by full path.
    pub fn find_effect(&self, path: &str) -> Option<&EffectDescriptor> {
        if self.path == path {
            return Some(self);
        }
        self.emitters
            .iter()
            .filter_map(|e| e.sub_effect.as_deref())
            .find_map(|sub| sub.find_effect(path))
    }

    /// Find an emitter in this subtree by full path.
    pub fn find_emitter(&self, path: &str) -> Option<&EmitterDescriptor> {
        self.emitters.iter().find_map(|e| {
            if e.path == path {
                Some(e)
            } else {
                e.sub_effect.as_deref().and_then(|sub| sub.find_emitter(path))
            }
        })
    }

    /// Emitters in this subtree, depth first.
    pub fn count_emitters(&self) -> usize {
        self.emitters
            .iter()
            .map(|e| 1 + e.sub_effect.as_deref().map_or(0, EffectDescriptor::count_emitters))
            .sum()
    }
}

/// A particle source inside an effect.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EmitterDescriptor {
    pub handle_x: i32,
    pub handle_y: i32,
    pub blend_mode: i32,
    /// Particles move relative to the emitter.
    pub relative: bool,
    pub random_color: bool,
    pub layer: i32,
    pub single_particle: bool,
    pub name: String,
    pub animate: bool,
    pub animate_once: bool,
    pub current_frame: f32,
    pub random_start_frame: bool,
    /// Never 0; an unset direction loads as 1.
    pub animation_direction: i32,
    pub uniform: bool,
    pub angle_type: i32,
    pub angle_offset: i32,
    pub lock_angle: bool,
    pub angle_relative: bool,
    pub use_effect_emission: bool,
    pub color_repeat: i32,
    pub alpha_repeat: i32,
    pub one_shot: bool,
    pub handle_centered: bool,
    pub group_particles: bool,

    /// Path of the owning effect followed by this emitter's name.
    pub path: String,
    /// Path of the owning effect.
    pub parent_effect: String,
    /// Merged index of the resolved sprite, `None` when unset or unresolved.
    pub sprite_index: Option<i32>,

    pub curves: CurveTable<EmitterAttribute>,
    /// Effect spawned where this emitter's particles die.
    pub sub_effect: Option<Box<EffectDescriptor>>,
}

impl EmitterDescriptor {
    /// Curve of one emitter attribute.
    #[inline]
    pub fn curve(&self, attr: EmitterAttribute) -> &AttributeCurve {
        self.curves.get(attr)
    }

    /// Look the emitter's sprite up in a sprite set.
    pub fn sprite<'s>(&self, sprites: &'s [SpriteDescriptor]) -> Option<&'s SpriteDescriptor> {
        self.sprite_index.and_then(|index| find_sprite(sprites, index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emitter(path: &str, sub_effect: Option<EffectDescriptor>) -> EmitterDescriptor {
        EmitterDescriptor {
            name: path.rsplit('/').next().unwrap().to_string(),
            path: path.to_string(),
            sub_effect: sub_effect.map(Box::new),
            ..Default::default()
        }
    }

    fn tree() -> EffectDescriptor {
        let burst = EffectDescriptor {
            path: "Fire/Flame/Sparks/Burst".into(),
            parent_emitter: Some("Fire/Flame/Sparks".into()),
            emitters: vec![emitter("Fire/Flame/Sparks/Burst/Embers", None)],
            ..Default::default()
        };
        EffectDescriptor {
            name: "Flame".into(),
            path: "Fire/Flame".into(),
            emitters: vec![
                emitter("Fire/Flame/Sparks", Some(burst)),
                emitter("Fire/Flame/Glow", None),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_find_in_subtree() {
        let flame = tree();
        assert_eq!(flame.find_effect("Fire/Flame").map(|e| e.name.as_str()), Some("Flame"));
        assert!(flame.find_effect("Fire/Flame/Sparks/Burst").unwrap().is_sub_effect());
        assert!(flame.find_effect("Fire/Nope").is_none());

        assert_eq!(
            flame.find_emitter("Fire/Flame/Sparks/Burst/Embers").map(|e| e.name.as_str()),
            Some("Embers")
        );
        assert_eq!(flame.emitter("Glow").map(|e| e.path.as_str()), Some("Fire/Flame/Glow"));
        assert_eq!(flame.count_emitters(), 3);
    }

    #[test]
    fn test_folder_from_path() {
        let flame = tree();
        assert_eq!(flame.folder(), Some("Fire"));
        assert_eq!(flame.find_effect("Fire/Flame/Sparks/Burst").unwrap().folder(), None);

        let flat = EffectDescriptor {
            name: "Smoke/Dense".into(),
            path: "Smoke/Dense".into(),
            ..Default::default()
        };
        assert_eq!(flat.folder(), None);
    }

    #[test]
    fn test_sprite_lookup() {
        let sprites = vec![SpriteDescriptor::new("spark.png", 8.0, 8.0, 1, 4, 0.0)];
        let mut e = emitter("Flame/Sparks", None);
        assert!(e.sprite(&sprites).is_none());

        e.sprite_index = Some(4);
        assert_eq!(e.sprite(&sprites).map(|s| s.name()), Some("spark"));
    }
}
