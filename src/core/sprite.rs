//! Sprite (shape) descriptors and index resolution.
//!
//! Several libraries can share one sprite set. Each library's shapes are
//! shifted by a merge offset when loaded so indices stay unique across the
//! combined set; emitters refer to sprites by that shifted index.

use std::path::Path;

use crate::util::enclosing_radius;

/// An image (possibly an animation strip) used by emitters.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpriteDescriptor {
    /// Image URL as written in the document.
    pub filename: String,
    /// Frame width in pixels.
    pub width: f32,
    /// Frame height in pixels.
    pub height: f32,
    /// Number of animation frames.
    pub frames: i32,
    /// Document index plus merge offset.
    pub index: i32,
    /// Largest distance from the handle to a visible pixel.
    pub max_radius: f32,
}

impl SpriteDescriptor {
    /// Build a descriptor, deriving the radius from the frame size when
    /// `max_radius` is zero.
    pub fn new(filename: impl Into<String>, width: f32, height: f32, frames: i32, index: i32, max_radius: f32) -> Self {
        let max_radius = if max_radius != 0.0 {
            max_radius
        } else {
            enclosing_radius(width, height)
        };
        Self {
            filename: filename.into(),
            width,
            height,
            frames,
            index,
            max_radius,
        }
    }

    /// Display name, derived from the file name.
    pub fn name(&self) -> &str {
        let normalized = self.filename.rsplit(&['/', '\\'][..]).next().unwrap_or(&self.filename);
        Path::new(normalized)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(normalized)
    }
}

/// Find the sprite whose stored index equals `index`.
///
/// Linear scan in set order; the first match wins.
pub fn find_sprite(sprites: &[SpriteDescriptor], index: i32) -> Option<&SpriteDescriptor> {
    sprites.iter().find(|s| s.index == index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sprite(name: &str, index: i32) -> SpriteDescriptor {
        SpriteDescriptor::new(name, 32.0, 32.0, 1, index, 16.0)
    }

    #[test]
    fn test_radius_explicit_or_derived() {
        let explicit = SpriteDescriptor::new("a.png", 64.0, 64.0, 1, 0, 12.0);
        assert_eq!(explicit.max_radius, 12.0);

        let derived = SpriteDescriptor::new("b.png", 6.0, 8.0, 1, 0, 0.0);
        assert_eq!(derived.max_radius, 5.0);
    }

    #[test]
    fn test_name_from_filename() {
        assert_eq!(sprite("textures/Flare.png", 0).name(), "Flare");
        assert_eq!(sprite("C:\\fx\\smoke.tga", 0).name(), "smoke");
        assert_eq!(sprite("spark", 0).name(), "spark");
    }

    #[test]
    fn test_find_sprite_with_offsets() {
        let sprites = vec![sprite("A", 5), sprite("B", 105)];

        assert_eq!(find_sprite(&sprites, 5 + 100).map(|s| s.filename.as_str()), Some("B"));
        assert_eq!(find_sprite(&sprites, 5).map(|s| s.filename.as_str()), Some("A"));
        assert!(find_sprite(&sprites, 999).is_none());
    }

    #[test]
    fn test_find_sprite_first_match_wins() {
        let sprites = vec![sprite("first", 3), sprite("second", 3)];
        assert_eq!(find_sprite(&sprites, 3).unwrap().filename, "first");
    }
}
