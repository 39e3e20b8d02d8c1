//! Recursive construction of effect trees from document nodes.
//!
//! Building never fails. Missing attributes and elements take their typed
//! defaults (0, 0.0, false, ""), so libraries written before or after a
//! field existed load unchanged.

use crate::core::{
    find_sprite, AttributeKey, CurveTable, DocumentNode, EffectAttribute, SpriteDescriptor, TangentHandle,
};
use crate::core::value::parse_decimal;

use super::{AnimationProperties, EffectDescriptor, EmitterDescriptor};

/// Element holding an emitter inside an effect.
pub const EMITTER_TAG: &str = "PARTICLE";
/// Element holding an effect (top level, in a folder, or as a sub-effect).
pub const EFFECT_TAG: &str = "EFFECT";

const ANIMATION_TAG: &str = "ANIMATION_PROPERTIES";
const HANDLE_TAG: &str = "CURVE";
const SHAPE_INDEX_TAG: &str = "SHAPE_INDEX";
const OVERRIDE_VALUE: &str = "VALUE";

/// Shared inputs of one effect build.
#[derive(Clone, Copy, Debug)]
pub struct BuildContext<'s> {
    /// Merged sprite set emitters resolve their shapes against.
    pub sprites: &'s [SpriteDescriptor],
    /// Added to every SHAPE_INDEX before lookup.
    pub shape_offset: i32,
}

impl<'s> BuildContext<'s> {
    pub fn new(sprites: &'s [SpriteDescriptor], shape_offset: i32) -> Self {
        Self { sprites, shape_offset }
    }
}

/// Build an effect and its whole subtree.
///
/// The path prefix is the owning emitter's path when there is one,
/// otherwise `folder_path`.
pub fn build_effect<N: DocumentNode>(
    node: &N,
    ctx: &BuildContext<'_>,
    parent_emitter: Option<&str>,
    folder_path: &str,
) -> EffectDescriptor {
    let name = node.attribute_as_string("NAME");
    let path = join_path(parent_emitter.unwrap_or(folder_path), &name);
    let _span = tracing::debug_span!("build_effect", path = %path).entered();

    let mut effect = EffectDescriptor {
        class: node.attribute_as_int("TYPE"),
        emit_at_points: node.attribute_as_bool("EMITATPOINTS"),
        max_gx: node.attribute_as_int("MAXGX"),
        max_gy: node.attribute_as_int("MAXGY"),
        emission_type: node.attribute_as_int("EMISSION_TYPE"),
        ellipse_arc: node.attribute_as_float("ELLIPSE_ARC"),
        effect_length: node.attribute_as_int("EFFECT_LENGTH"),
        lock_aspect: node.attribute_as_bool("UNIFORM"),
        name,
        handle_center: node.attribute_as_bool("HANDLE_CENTER"),
        handle_x: node.attribute_as_int("HANDLE_X"),
        handle_y: node.attribute_as_int("HANDLE_Y"),
        traverse_edge: node.attribute_as_bool("TRAVERSE_EDGE"),
        end_behavior: node.attribute_as_int("END_BEHAVIOUR"),
        distance_set_by_life: node.attribute_as_bool("DISTANCE_SET_BY_LIFE"),
        reverse_spawn: node.attribute_as_bool("REVERSE_SPAWN_DIRECTION"),
        animation: node.child_by_name(ANIMATION_TAG).map(|a| load_animation(&a)),
        path,
        parent_emitter: parent_emitter.map(str::to_string),
        curves: CurveTable::new(),
        emitters: Vec::new(),
    };

    collect_curves(node, &mut effect.curves);

    // Libraries older than the stretch attribute get an unstretched default.
    if node.child_by_name(EffectAttribute::Stretch.tag()).is_none() {
        effect.curves.push(EffectAttribute::Stretch, 0.0, 1.0);
    }

    for particle in node.children_by_name(EMITTER_TAG) {
        let emitter = build_emitter(&particle, ctx, &effect.path);
        effect.emitters.push(emitter);
    }

    tracing::debug!(
        emitters = effect.emitters.len(),
        keys = effect.curves.num_keys(),
        "built effect"
    );
    effect
}

/// Build an emitter, its curves and its optional sub-effect.
pub fn build_emitter<N: DocumentNode>(node: &N, ctx: &BuildContext<'_>, parent_effect: &str) -> EmitterDescriptor {
    let name = node.attribute_as_string("NAME");
    // Always separated, even under an unnamed top-level effect.
    let path = format!("{parent_effect}/{name}");

    let mut emitter = EmitterDescriptor {
        handle_x: node.attribute_as_int("HANDLE_X"),
        handle_y: node.attribute_as_int("HANDLE_Y"),
        blend_mode: node.attribute_as_int("BLENDMODE"),
        relative: node.attribute_as_bool("RELATIVE"),
        random_color: node.attribute_as_bool("RANDOM_COLOR"),
        layer: node.attribute_as_int("LAYER"),
        single_particle: node.attribute_as_bool("SINGLE_PARTICLE"),
        name,
        animate: node.attribute_as_bool("ANIMATE"),
        animate_once: node.attribute_as_bool("ANIMATE_ONCE"),
        current_frame: node.attribute_as_float("FRAME"),
        random_start_frame: node.attribute_as_bool("RANDOM_START_FRAME"),
        animation_direction: match node.attribute_as_int("ANIMATION_DIRECTION") {
            0 => 1,
            direction => direction,
        },
        uniform: node.attribute_as_bool("UNIFORM"),
        group_particles: node.attribute_as_bool("GROUP_PARTICLES"),
        path,
        parent_effect: parent_effect.to_string(),
        ..EmitterDescriptor::default()
    };

    for field in OverridableField::ALL {
        field.load(node, &mut emitter);
    }

    if let Some(shape) = node.child_by_name(SHAPE_INDEX_TAG) {
        // Offsets wrap like the editor's int arithmetic; a wrapped index just fails to resolve.
        let index = parse_decimal(shape.text_value()).wrapping_add(ctx.shape_offset);
        match find_sprite(ctx.sprites, index) {
            Some(sprite) => emitter.sprite_index = Some(sprite.index),
            None => tracing::warn!(path = %emitter.path, index, "shape index does not match any sprite"),
        }
    }

    collect_curves(node, &mut emitter.curves);

    if let Some(sub) = node.child_by_name(EFFECT_TAG) {
        let effect = build_effect(&sub, ctx, Some(&emitter.path), "");
        emitter.sub_effect = Some(Box::new(effect));
    }

    tracing::trace!(
        path = %emitter.path,
        keys = emitter.curves.num_keys(),
        sub_effect = emitter.sub_effect.is_some(),
        "built emitter"
    );
    emitter
}

/// Append every category's keyframes in document order.
///
/// Each category element adds one key; a `<CURVE>` child sets that key's
/// tangent handles, the last one winning if several are present.
pub fn collect_curves<N: DocumentNode, K: AttributeKey>(node: &N, table: &mut CurveTable<K>) {
    for &key in K::ALL {
        for element in node.children_by_name(key.tag()) {
            let keyframe = table.push(
                key,
                element.attribute_as_float("FRAME"),
                element.attribute_as_float("VALUE"),
            );
            if !key.accepts_handles() {
                continue;
            }
            for handle in element.children_by_name(HANDLE_TAG) {
                keyframe.set_handle(TangentHandle::new(
                    handle.attribute_as_float("LEFT_CURVE_POINT_X"),
                    handle.attribute_as_float("LEFT_CURVE_POINT_Y"),
                    handle.attribute_as_float("RIGHT_CURVE_POINT_X"),
                    handle.attribute_as_float("RIGHT_CURVE_POINT_Y"),
                ));
            }
        }
    }
}

fn load_animation<N: DocumentNode>(node: &N) -> AnimationProperties {
    let looped = node.attribute_as_bool("LOOPED");
    AnimationProperties {
        frames: node.attribute_as_int("FRAMES"),
        width: node.attribute_as_int("WIDTH"),
        height: node.attribute_as_int("HEIGHT"),
        x: node.attribute_as_int("X"),
        y: node.attribute_as_int("Y"),
        seed: node.attribute_as_int("SEED"),
        looped,
        zoom: node.attribute_as_float("ZOOM"),
        // Existing libraries store no separate offset; it follows LOOPED.
        frame_offset: looped as i32,
    }
}

/// Effect path: `prefix/name`, or just `name` when the prefix is empty.
fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}/{name}")
    }
}

/// Emitter settings with a legacy attribute form and a newer child-element
/// form. The element's `VALUE` always wins when present.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverridableField {
    AngleType,
    AngleOffset,
    LockAngle,
    AngleRelative,
    UseEffectEmission,
    ColorRepeat,
    AlphaRepeat,
    OneShot,
    HandleCentered,
}

impl OverridableField {
    pub const ALL: [Self; 9] = [
        Self::AngleType,
        Self::AngleOffset,
        Self::LockAngle,
        Self::AngleRelative,
        Self::UseEffectEmission,
        Self::ColorRepeat,
        Self::AlphaRepeat,
        Self::OneShot,
        Self::HandleCentered,
    ];

    /// Legacy attribute name on the emitter element.
    pub fn attribute(self) -> &'static str {
        match self {
            Self::AngleType => "ANGLE_TYPE",
            Self::AngleOffset => "ANGLE_OFFSET",
            Self::LockAngle => "LOCK_ANGLE",
            Self::AngleRelative => "ANGLE_RELATIVE",
            Self::UseEffectEmission => "USE_EFFECT_EMISSION",
            Self::ColorRepeat => "COLOR_REPEAT",
            Self::AlphaRepeat => "ALPHA_REPEAT",
            Self::OneShot => "ONE_SHOT",
            Self::HandleCentered => "HANDLE_CENTERED",
        }
    }

    /// Child element name carrying the override.
    pub fn element(self) -> &'static str {
        match self {
            Self::LockAngle => "LOCKED_ANGLE",
            other => other.attribute(),
        }
    }

    /// Read the field from the child element if present, else from the attribute.
    pub fn load<N: DocumentNode>(self, node: &N, emitter: &mut EmitterDescriptor) {
        match node.child_by_name(self.element()) {
            Some(child) => self.store(&child, OVERRIDE_VALUE, emitter),
            None => self.store(node, self.attribute(), emitter),
        }
    }

    fn store<N: DocumentNode>(self, source: &N, attr: &str, e: &mut EmitterDescriptor) {
        match self {
            Self::AngleType => e.angle_type = source.attribute_as_int(attr),
            Self::AngleOffset => e.angle_offset = source.attribute_as_int(attr),
            Self::LockAngle => e.lock_angle = source.attribute_as_bool(attr),
            Self::AngleRelative => e.angle_relative = source.attribute_as_bool(attr),
            Self::UseEffectEmission => e.use_effect_emission = source.attribute_as_bool(attr),
            Self::ColorRepeat => e.color_repeat = source.attribute_as_int(attr),
            Self::AlphaRepeat => e.alpha_repeat = source.attribute_as_int(attr),
            Self::OneShot => e.one_shot = source.attribute_as_bool(attr),
            Self::HandleCentered => e.handle_centered = source.attribute_as_bool(attr),
        }
    }
}

#[cfg(test)]
mod tests;
