use super::*;
use crate::core::EmitterAttribute;
use crate::util::Vec2;
use crate::xml::XmlDocument;

fn with_effect<R>(xml: &str, sprites: &[SpriteDescriptor], offset: i32, f: impl FnOnce(EffectDescriptor) -> R) -> R {
    let doc = XmlDocument::parse(xml).unwrap();
    let node = doc.root().child_by_name(EFFECT_TAG).unwrap();
    let effect = build_effect(&node, &BuildContext::new(sprites, offset), None, "");
    f(effect)
}

fn build(xml: &str) -> EffectDescriptor {
    with_effect(xml, &[], 0, |e| e)
}

#[test]
fn test_scalar_fields_and_defaults() {
    let effect = build(
        r#"<EFFECT NAME="Smoke" TYPE="2" EMITATPOINTS="1" MAXGX="4" MAXGY="3"
                   EMISSION_TYPE="1" ELLIPSE_ARC="180.5" EFFECT_LENGTH="2000" UNIFORM="true"
                   HANDLE_CENTER="1" HANDLE_X="16" HANDLE_Y="-8" TRAVERSE_EDGE="1"
                   END_BEHAVIOUR="2" DISTANCE_SET_BY_LIFE="1"/>"#,
    );

    assert_eq!(effect.name, "Smoke");
    assert_eq!(effect.path, "Smoke");
    assert_eq!(effect.class, 2);
    assert!(effect.emit_at_points);
    assert_eq!((effect.max_gx, effect.max_gy), (4, 3));
    assert_eq!(effect.emission_type, 1);
    assert_eq!(effect.ellipse_arc, 180.5);
    assert_eq!(effect.effect_length, 2000);
    assert!(effect.lock_aspect);
    assert!(effect.handle_center);
    assert_eq!((effect.handle_x, effect.handle_y), (16, -8));
    assert!(effect.traverse_edge);
    assert_eq!(effect.end_behavior, 2);
    assert!(effect.distance_set_by_life);
    assert!(!effect.reverse_spawn);
    assert!(effect.animation.is_none());
    assert!(effect.parent_emitter.is_none());
    assert!(effect.emitters.is_empty());
}

#[test]
fn test_animation_block() {
    let effect = build(
        r#"<EFFECT NAME="Anim">
            <ANIMATION_PROPERTIES FRAMES="32" WIDTH="128" HEIGHT="64" X="5" Y="6" SEED="77" LOOPED="1" ZOOM="1.5"/>
        </EFFECT>"#,
    );
    let anim = effect.animation.unwrap();
    assert_eq!(anim.frames, 32);
    assert_eq!((anim.width, anim.height), (128, 64));
    assert_eq!((anim.x, anim.y), (5, 6));
    assert_eq!(anim.seed, 77);
    assert!(anim.looped);
    assert_eq!(anim.zoom, 1.5);
    assert_eq!(anim.frame_offset, 1);
}

#[test]
fn test_stretch_default_injected() {
    let effect = build(r#"<EFFECT NAME="Old"><AMOUNT FRAME="0" VALUE="1"/></EFFECT>"#);
    let stretch = effect.curve(EffectAttribute::Stretch);
    assert_eq!(stretch.keys(), &[crate::core::Keyframe::new(0.0, 1.0)]);
}

#[test]
fn test_declared_stretch_not_padded() {
    let effect = build(
        r#"<EFFECT NAME="New">
            <STRETCH FRAME="0" VALUE="2"/>
            <STRETCH FRAME="50" VALUE="3"/>
        </EFFECT>"#,
    );
    let values: Vec<f32> = effect.curve(EffectAttribute::Stretch).iter().map(|k| k.value).collect();
    assert_eq!(values, vec![2.0, 3.0]);
}

#[test]
fn test_effect_curves_accumulate_with_handles() {
    let effect = build(
        r#"<EFFECT NAME="Curvy">
            <LIFE FRAME="0" VALUE="100">
                <CURVE LEFT_CURVE_POINT_X="-1" LEFT_CURVE_POINT_Y="90" RIGHT_CURVE_POINT_X="1" RIGHT_CURVE_POINT_Y="110"/>
            </LIFE>
            <AMOUNT FRAME="0" VALUE="5"/>
            <LIFE FRAME="20" VALUE="50"/>
            <LIFE FRAME="10" VALUE="75">
                <CURVE LEFT_CURVE_POINT_X="1" LEFT_CURVE_POINT_Y="1" RIGHT_CURVE_POINT_X="1" RIGHT_CURVE_POINT_Y="1"/>
                <CURVE LEFT_CURVE_POINT_X="9" LEFT_CURVE_POINT_Y="8" RIGHT_CURVE_POINT_X="7" RIGHT_CURVE_POINT_Y="6"/>
            </LIFE>
        </EFFECT>"#,
    );

    let life = effect.curve(EffectAttribute::Life);
    let frames: Vec<f32> = life.iter().map(|k| k.frame).collect();
    assert_eq!(frames, vec![0.0, 20.0, 10.0]);

    let first = life.keys()[0].handle.unwrap();
    assert_eq!(first.left, Vec2::new(-1.0, 90.0));
    assert_eq!(first.right, Vec2::new(1.0, 110.0));
    assert!(life.keys()[1].handle.is_none());
    assert_eq!(life.keys()[2].handle, Some(TangentHandle::new(9.0, 8.0, 7.0, 6.0)));

    assert_eq!(effect.curve(EffectAttribute::Amount).len(), 1);
    assert!(effect.curve(EffectAttribute::GlobalZoom).is_empty());
}

#[test]
fn test_emitter_scalars_and_paths() {
    let effect = build(
        r#"<EFFECT NAME="Flame">
            <PARTICLE NAME="Sparks" HANDLE_X="3" HANDLE_Y="4" BLENDMODE="4" RELATIVE="1" RANDOM_COLOR="1"
                      LAYER="2" SINGLE_PARTICLE="1" ANIMATE="1" ANIMATE_ONCE="1" FRAME="2.5"
                      RANDOM_START_FRAME="1" ANIMATION_DIRECTION="-1" UNIFORM="1" GROUP_PARTICLES="1"/>
            <PARTICLE NAME="Glow"/>
        </EFFECT>"#,
    );

    let names: Vec<&str> = effect.emitters.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Sparks", "Glow"]);

    let sparks = &effect.emitters[0];
    assert_eq!(sparks.path, "Flame/Sparks");
    assert_eq!(sparks.parent_effect, "Flame");
    assert_eq!((sparks.handle_x, sparks.handle_y), (3, 4));
    assert_eq!(sparks.blend_mode, 4);
    assert!(sparks.relative && sparks.random_color && sparks.single_particle);
    assert_eq!(sparks.layer, 2);
    assert!(sparks.animate && sparks.animate_once && sparks.random_start_frame);
    assert_eq!(sparks.current_frame, 2.5);
    assert_eq!(sparks.animation_direction, -1);
    assert!(sparks.uniform && sparks.group_particles);
    assert!(sparks.sprite_index.is_none());
    assert!(sparks.sub_effect.is_none());
}

#[test]
fn test_zero_animation_direction_becomes_one() {
    let effect = build(
        r#"<EFFECT NAME="E">
            <PARTICLE NAME="Zero" ANIMATION_DIRECTION="0"/>
            <PARTICLE NAME="Missing"/>
            <PARTICLE NAME="Two" ANIMATION_DIRECTION="2"/>
        </EFFECT>"#,
    );
    let dirs: Vec<i32> = effect.emitters.iter().map(|e| e.animation_direction).collect();
    assert_eq!(dirs, vec![1, 1, 2]);
}

#[test]
fn test_child_element_overrides_attribute() {
    let effect = build(
        r#"<EFFECT NAME="E">
            <PARTICLE NAME="Both" ANGLE_TYPE="1" ANGLE_OFFSET="10" LOCK_ANGLE="0" ANGLE_RELATIVE="0"
                      USE_EFFECT_EMISSION="0" COLOR_REPEAT="1" ALPHA_REPEAT="1" ONE_SHOT="0" HANDLE_CENTERED="0">
                <ANGLE_TYPE VALUE="2"/>
                <ANGLE_OFFSET VALUE="45"/>
                <LOCKED_ANGLE VALUE="1"/>
                <ANGLE_RELATIVE VALUE="1"/>
                <USE_EFFECT_EMISSION VALUE="1"/>
                <COLOR_REPEAT VALUE="3"/>
                <ALPHA_REPEAT VALUE="4"/>
                <ONE_SHOT VALUE="1"/>
                <HANDLE_CENTERED VALUE="1"/>
            </PARTICLE>
            <PARTICLE NAME="Legacy" ANGLE_TYPE="1" ANGLE_OFFSET="10" LOCK_ANGLE="1" COLOR_REPEAT="2" ONE_SHOT="1"/>
        </EFFECT>"#,
    );

    let both = &effect.emitters[0];
    assert_eq!(both.angle_type, 2);
    assert_eq!(both.angle_offset, 45);
    assert!(both.lock_angle);
    assert!(both.angle_relative);
    assert!(both.use_effect_emission);
    assert_eq!(both.color_repeat, 3);
    assert_eq!(both.alpha_repeat, 4);
    assert!(both.one_shot);
    assert!(both.handle_centered);

    let legacy = &effect.emitters[1];
    assert_eq!(legacy.angle_type, 1);
    assert_eq!(legacy.angle_offset, 10);
    assert!(legacy.lock_angle);
    assert_eq!(legacy.color_repeat, 2);
    assert!(legacy.one_shot);
    assert!(!legacy.handle_centered);
}

#[test]
fn test_override_element_without_value_resets_field() {
    let effect = build(
        r#"<EFFECT NAME="E">
            <PARTICLE NAME="P" ANGLE_TYPE="3"><ANGLE_TYPE/></PARTICLE>
        </EFFECT>"#,
    );
    assert_eq!(effect.emitters[0].angle_type, 0);
}

#[test]
fn test_override_table_names() {
    assert_eq!(OverridableField::LockAngle.attribute(), "LOCK_ANGLE");
    assert_eq!(OverridableField::LockAngle.element(), "LOCKED_ANGLE");
    for field in OverridableField::ALL {
        if field != OverridableField::LockAngle {
            assert_eq!(field.attribute(), field.element());
        }
    }
}

#[test]
fn test_shape_index_resolution() {
    let sprites = vec![
        SpriteDescriptor::new("A", 8.0, 8.0, 1, 5, 0.0),
        SpriteDescriptor::new("B", 8.0, 8.0, 1, 105, 0.0),
    ];
    let xml = r#"<EFFECT NAME="E">
        <PARTICLE NAME="Five"><SHAPE_INDEX>5</SHAPE_INDEX></PARTICLE>
        <PARTICLE NAME="Lost"><SHAPE_INDEX>999</SHAPE_INDEX></PARTICLE>
        <PARTICLE NAME="None"/>
    </EFFECT>"#;

    with_effect(xml, &sprites, 100, |effect| {
        let five = &effect.emitters[0];
        assert_eq!(five.sprite_index, Some(105));
        assert_eq!(five.sprite(&sprites).unwrap().filename, "B");
        assert!(effect.emitters[1].sprite_index.is_none());
        assert!(effect.emitters[2].sprite_index.is_none());
    });

    with_effect(xml, &sprites, 0, |effect| {
        assert_eq!(effect.emitters[0].sprite(&sprites).unwrap().filename, "A");
    });
}

#[test]
fn test_shape_index_near_int_limit_does_not_overflow() {
    let sprites = vec![SpriteDescriptor::new("A", 8.0, 8.0, 1, 5, 0.0)];
    let xml = r#"<EFFECT NAME="E">
        <PARTICLE NAME="Huge"><SHAPE_INDEX>2147483647</SHAPE_INDEX></PARTICLE>
    </EFFECT>"#;

    with_effect(xml, &sprites, 100, |effect| {
        assert!(effect.emitters[0].sprite_index.is_none());
    });
}

#[test]
fn test_shape_index_text_is_decimal() {
    let sprites = vec![
        SpriteDescriptor::new("zero", 8.0, 8.0, 1, 0, 0.0),
        SpriteDescriptor::new("sixteen", 8.0, 8.0, 1, 16, 0.0),
    ];
    let xml = r#"<EFFECT NAME="E"><PARTICLE NAME="P"><SHAPE_INDEX>0x10</SHAPE_INDEX></PARTICLE></EFFECT>"#;

    with_effect(xml, &sprites, 0, |effect| {
        assert_eq!(effect.emitters[0].sprite_index, Some(0));
    });
}

#[test]
fn test_color_channels_ignore_handles() {
    let effect = build(
        r#"<EFFECT NAME="E">
            <PARTICLE NAME="P">
                <RED_OVERTIME FRAME="0" VALUE="255"><CURVE LEFT_CURVE_POINT_X="1" LEFT_CURVE_POINT_Y="1" RIGHT_CURVE_POINT_X="1" RIGHT_CURVE_POINT_Y="1"/></RED_OVERTIME>
                <GREEN_OVERTIME FRAME="0" VALUE="128"><CURVE LEFT_CURVE_POINT_X="1"/></GREEN_OVERTIME>
                <BLUE_OVERTIME FRAME="0" VALUE="0"><CURVE RIGHT_CURVE_POINT_Y="1"/></BLUE_OVERTIME>
                <ALPHA_OVERTIME FRAME="0" VALUE="1"><CURVE LEFT_CURVE_POINT_X="2" LEFT_CURVE_POINT_Y="3" RIGHT_CURVE_POINT_X="4" RIGHT_CURVE_POINT_Y="5"/></ALPHA_OVERTIME>
            </PARTICLE>
        </EFFECT>"#,
    );

    let p = &effect.emitters[0];
    for channel in [EmitterAttribute::RedOvertime, EmitterAttribute::GreenOvertime, EmitterAttribute::BlueOvertime] {
        let curve = p.curve(channel);
        assert_eq!(curve.len(), 1, "{channel}");
        assert!(curve.iter().all(|k| k.handle.is_none()), "{channel}");
    }
    assert_eq!(p.curve(EmitterAttribute::RedOvertime).keys()[0].value, 255.0);
    assert_eq!(
        p.curve(EmitterAttribute::AlphaOvertime).keys()[0].handle,
        Some(TangentHandle::new(2.0, 3.0, 4.0, 5.0))
    );
}

#[test]
fn test_every_emitter_category_collected() {
    let mut xml = String::from(r#"<EFFECT NAME="E"><PARTICLE NAME="P">"#);
    for (i, attr) in EmitterAttribute::ALL.iter().enumerate() {
        xml.push_str(&format!(r#"<{tag} FRAME="{i}" VALUE="{i}"/>"#, tag = attr.tag()));
    }
    xml.push_str("</PARTICLE></EFFECT>");

    let effect = build(&xml);
    let p = &effect.emitters[0];
    for (i, attr) in EmitterAttribute::ALL.iter().enumerate() {
        let keys = p.curve(*attr).keys();
        assert_eq!(keys.len(), 1, "{attr}");
        assert_eq!(keys[0].frame, i as f32, "{attr}");
    }
}

#[test]
fn test_nested_sub_effect() {
    let effect = with_effect(
        r#"<EFFECT NAME="Flame">
            <PARTICLE NAME="Sparks">
                <EFFECT NAME="Burst">
                    <PARTICLE NAME="Embers"/>
                </EFFECT>
                <EFFECT NAME="Ignored"/>
            </PARTICLE>
        </EFFECT>"#,
        &[],
        0,
        |e| e,
    );

    let sparks = &effect.emitters[0];
    let burst = sparks.sub_effect.as_deref().unwrap();
    assert_eq!(burst.name, "Burst");
    assert_eq!(burst.path, "Flame/Sparks/Burst");
    assert_eq!(burst.parent_emitter.as_deref(), Some("Flame/Sparks"));
    assert_eq!(burst.curve(EffectAttribute::Stretch).len(), 1);
    assert_eq!(burst.emitters[0].path, "Flame/Sparks/Burst/Embers");
    assert_eq!(burst.emitters[0].parent_effect, "Flame/Sparks/Burst");
}

#[test]
fn test_folder_path_prefix() {
    let doc = XmlDocument::parse(r#"<EFFECT NAME="Flame"><PARTICLE NAME="Sparks"/></EFFECT>"#).unwrap();
    let node = doc.root().child_by_name(EFFECT_TAG).unwrap();
    let effect = build_effect(&node, &BuildContext::new(&[], 0), None, "Fire");
    assert_eq!(effect.path, "Fire/Flame");
    assert_eq!(effect.emitters[0].path, "Fire/Flame/Sparks");
}

#[test]
fn test_emitter_under_unnamed_effect_keeps_separator() {
    let effect = build(r#"<EFFECT><PARTICLE NAME="Sparks"/></EFFECT>"#);
    assert_eq!(effect.path, "");
    assert_eq!(effect.emitters[0].path, "/Sparks");
    assert_eq!(effect.emitters[0].parent_effect, "");
}

#[test]
fn test_join_path() {
    assert_eq!(join_path("", "Smoke"), "Smoke");
    assert_eq!(join_path("Fire", "Flame"), "Fire/Flame");
    assert_eq!(join_path("Fire", ""), "Fire/");
}
