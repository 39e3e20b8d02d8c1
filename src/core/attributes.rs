//! Attribute categories of effects and emitters.
//!
//! Each category maps one-to-one to the element name used in effect
//! library documents.

use super::curve::AttributeKey;

macro_rules! attribute_set {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $tag:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            const TAGS: &'static [&'static str] = &[$($tag),+];
        }

        impl AttributeKey for $name {
            const ALL: &'static [Self] = &[$($name::$variant),+];

            #[inline]
            fn tag(self) -> &'static str {
                Self::TAGS[self as usize]
            }

            #[inline]
            fn index(self) -> usize {
                self as usize
            }

            fn accepts_handles(self) -> bool {
                self.smoothable()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.tag())
            }
        }
    };
}

attribute_set! {
    /// Effect-wide (global) attribute categories.
    EffectAttribute {
        Amount => "AMOUNT",
        Life => "LIFE",
        SizeX => "SIZEX",
        SizeY => "SIZEY",
        Velocity => "VELOCITY",
        Weight => "WEIGHT",
        Spin => "SPIN",
        Alpha => "ALPHA",
        EmissionAngle => "EMISSIONANGLE",
        EmissionRange => "EMISSIONRANGE",
        AreaWidth => "AREA_WIDTH",
        AreaHeight => "AREA_HEIGHT",
        Angle => "ANGLE",
        Stretch => "STRETCH",
        GlobalZoom => "GLOBAL_ZOOM",
    }
}

impl EffectAttribute {
    #[inline]
    fn smoothable(self) -> bool {
        true
    }
}

attribute_set! {
    /// Per-emitter attribute categories: base values, variations and over-lifetime curves.
    EmitterAttribute {
        Life => "LIFE",
        Amount => "AMOUNT",
        BaseSpeed => "BASE_SPEED",
        BaseWeight => "BASE_WEIGHT",
        BaseSizeX => "BASE_SIZE_X",
        BaseSizeY => "BASE_SIZE_Y",
        BaseSpin => "BASE_SPIN",
        Splatter => "SPLATTER",
        LifeVariation => "LIFE_VARIATION",
        AmountVariation => "AMOUNT_VARIATION",
        VelocityVariation => "VELOCITY_VARIATION",
        WeightVariation => "WEIGHT_VARIATION",
        SizeXVariation => "SIZE_X_VARIATION",
        SizeYVariation => "SIZE_Y_VARIATION",
        SpinVariation => "SPIN_VARIATION",
        DirectionVariation => "DIRECTION_VARIATION",
        AlphaOvertime => "ALPHA_OVERTIME",
        VelocityOvertime => "VELOCITY_OVERTIME",
        WeightOvertime => "WEIGHT_OVERTIME",
        ScaleXOvertime => "SCALE_X_OVERTIME",
        ScaleYOvertime => "SCALE_Y_OVERTIME",
        SpinOvertime => "SPIN_OVERTIME",
        Direction => "DIRECTION",
        DirectionVariationOvertime => "DIRECTION_VARIATIONOT",
        FramerateOvertime => "FRAMERATE_OVERTIME",
        StretchOvertime => "STRETCH_OVERTIME",
        RedOvertime => "RED_OVERTIME",
        GreenOvertime => "GREEN_OVERTIME",
        BlueOvertime => "BLUE_OVERTIME",
        GlobalVelocity => "GLOBAL_VELOCITY",
        EmissionAngle => "EMISSION_ANGLE",
        EmissionRange => "EMISSION_RANGE",
    }
}

impl EmitterAttribute {
    /// Colour channels are always piecewise linear.
    #[inline]
    fn smoothable(self) -> bool {
        !self.is_color()
    }

    #[inline]
    pub fn is_color(self) -> bool {
        matches!(
            self,
            EmitterAttribute::RedOvertime | EmitterAttribute::GreenOvertime | EmitterAttribute::BlueOvertime
        )
    }
}
