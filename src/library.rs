//! Effect library: sprites and effects gathered from one or more documents.
//!
//! The library is the caller side of the loader protocol. Each loaded
//! document gets a merge offset equal to the number of sprites already
//! held, so several documents can share one sprite index space.
//!
//! ## Example
//!
//! ```ignore
//! use fxlib::library::{EffectLibrary, LoadOptions};
//!
//! let mut lib = EffectLibrary::new();
//! lib.load_file("fire.xml", &LoadOptions::default())?;
//! lib.load_file("water.xml", &LoadOptions::default())?;
//! let flame = lib.effect("Fire/Flame").unwrap();
//! ```

use std::path::Path;

use crate::core::{DocumentNode, SpriteDescriptor};
use crate::effect::{EffectDescriptor, EmitterDescriptor};
use crate::loader::EffectLoader;
use crate::util::{Error, Result};
use crate::xml::{XmlDocument, XmlSource};

/// File loading options.
#[derive(Clone, Debug)]
pub struct LoadOptions {
    /// Memory-map files instead of reading them (needs the `mmap` feature).
    pub use_mmap: bool,
    /// Explicit merge offset; defaults to the number of sprites already loaded.
    pub shape_offset: Option<i32>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            use_mmap: true,
            shape_offset: None,
        }
    }
}

/// What one document contributed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub shapes: usize,
    pub effects: usize,
    /// Emitters over all effects, sub-effects included.
    pub emitters: usize,
}

/// Sprites and effects accumulated from loaded documents.
#[derive(Clone, Debug, Default)]
pub struct EffectLibrary {
    sprites: Vec<SpriteDescriptor>,
    effects: Vec<EffectDescriptor>,
    last_error: String,
}

impl EffectLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a document held in memory.
    pub fn load_str(&mut self, text: &str) -> Result<LoadStats> {
        self.load_str_opts(text, &LoadOptions::default())
    }

    /// Load a document held in memory with explicit options.
    pub fn load_str_opts(&mut self, text: &str, opts: &LoadOptions) -> Result<LoadStats> {
        let parsed = XmlDocument::parse(text);
        let offset = self.offset_for(opts);
        let result = self.load_parsed(parsed.as_ref().map(XmlDocument::root).map_err(Error::clone), offset);
        self.record(result)
    }

    /// Load a document from a file.
    pub fn load_file(&mut self, path: impl AsRef<Path>, opts: &LoadOptions) -> Result<LoadStats> {
        let offset = self.offset_for(opts);
        let result = XmlSource::open_opts(path, opts.use_mmap).and_then(|source| {
            let _span = tracing::info_span!("load_file", path = %source.name()).entered();
            let parsed = source.parse();
            self.load_parsed(parsed.as_ref().map(XmlDocument::root).map_err(Error::clone), offset)
        });
        self.record(result)
    }

    /// Drive a loader over any document backend.
    ///
    /// On failure the library is left exactly as it was.
    pub fn load_document<N: DocumentNode>(&mut self, document: N, shape_offset: i32) -> Result<LoadStats> {
        let result = self.load_parsed(Ok(document), shape_offset);
        self.record(result)
    }

    fn load_parsed<N: DocumentNode>(&mut self, document: Result<N>, shape_offset: i32) -> Result<LoadStats> {
        let mut loader = EffectLoader::new(shape_offset);
        loader.open_parsed(document)?;

        let first_new = self.sprites.len();
        self.sprites.extend(loader.shapes());
        let shapes = self.sprites.len() - first_new;

        let mut effects = Vec::new();
        loop {
            match loader.next_effect(&self.sprites) {
                Ok(effect) => effects.push(effect),
                Err(Error::NoMoreEffects) => break,
                Err(e) => {
                    self.sprites.truncate(first_new);
                    return Err(e);
                }
            }
        }

        let stats = LoadStats {
            shapes,
            effects: effects.len(),
            emitters: effects.iter().map(EffectDescriptor::count_emitters).sum(),
        };
        self.effects.append(&mut effects);

        tracing::info!(shapes = stats.shapes, effects = stats.effects, emitters = stats.emitters, "loaded library");
        Ok(stats)
    }

    fn record(&mut self, result: Result<LoadStats>) -> Result<LoadStats> {
        match &result {
            Ok(_) => self.last_error.clear(),
            Err(e) => {
                tracing::debug!(error = %e, "library load failed");
                self.last_error = e.to_string();
            }
        }
        result
    }

    /// Diagnostic of the last failed load, empty if it succeeded.
    #[inline]
    pub fn last_error(&self) -> &str {
        &self.last_error
    }

    fn offset_for(&self, opts: &LoadOptions) -> i32 {
        opts.shape_offset.unwrap_or(self.sprites.len() as i32)
    }

    /// All sprites, in load order.
    #[inline]
    pub fn sprites(&self) -> &[SpriteDescriptor] {
        &self.sprites
    }

    /// All top-level effects, in load order.
    #[inline]
    pub fn effects(&self) -> &[EffectDescriptor] {
        &self.effects
    }

    /// Check if nothing has been loaded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty() && self.effects.is_empty()
    }

    /// Find an effect (top level or sub-effect) by full path.
    pub fn effect(&self, path: &str) -> Option<&EffectDescriptor> {
        self.effects.iter().find_map(|e| e.find_effect(path))
    }

    /// Find an emitter anywhere in the library by full path.
    pub fn emitter(&self, path: &str) -> Option<&EmitterDescriptor> {
        self.effects.iter().find_map(|e| e.find_emitter(path))
    }

    /// Sprite used by an emitter.
    pub fn sprite_for(&self, emitter: &EmitterDescriptor) -> Option<&SpriteDescriptor> {
        emitter.sprite(&self.sprites)
    }

    /// Drop everything loaded so far.
    pub fn clear(&mut self) {
        self.sprites.clear();
        self.effects.clear();
        self.last_error.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIRE: &str = r#"<EFFECTS>
        <SHAPES>
            <IMAGE URL="flame.png" WIDTH="32" HEIGHT="32" FRAMES="4" INDEX="0"/>
            <IMAGE URL="spark.png" WIDTH="8" HEIGHT="8" FRAMES="1" INDEX="1"/>
        </SHAPES>
        <FOLDER NAME="Fire">
            <EFFECT NAME="Flame">
                <PARTICLE NAME="Core"><SHAPE_INDEX>0</SHAPE_INDEX></PARTICLE>
                <PARTICLE NAME="Sparks"><SHAPE_INDEX>1</SHAPE_INDEX>
                    <EFFECT NAME="Pop"><PARTICLE NAME="Bits"><SHAPE_INDEX>1</SHAPE_INDEX></PARTICLE></EFFECT>
                </PARTICLE>
            </EFFECT>
        </FOLDER>
    </EFFECTS>"#;

    const WATER: &str = r#"<EFFECTS>
        <SHAPES><IMAGE URL="drop.png" WIDTH="4" HEIGHT="4" FRAMES="1" INDEX="0"/></SHAPES>
        <EFFECT NAME="Rain"><PARTICLE NAME="Drops"><SHAPE_INDEX>0</SHAPE_INDEX></PARTICLE></EFFECT>
    </EFFECTS>"#;

    #[test]
    fn test_load_single_document() {
        let mut lib = EffectLibrary::new();
        assert!(lib.is_empty());

        let stats = lib.load_str(FIRE).unwrap();
        assert_eq!(stats, LoadStats { shapes: 2, effects: 1, emitters: 3 });

        let sparks = lib.emitter("Fire/Flame/Sparks").unwrap();
        assert_eq!(lib.sprite_for(sparks).unwrap().filename, "spark.png");
        assert!(lib.effect("Fire/Flame/Sparks/Pop").is_some());
        assert_eq!(lib.emitter("Fire/Flame/Sparks/Pop/Bits").unwrap().sprite_index, Some(1));
    }

    #[test]
    fn test_merge_offset_keeps_documents_apart() {
        let mut lib = EffectLibrary::new();
        lib.load_str(FIRE).unwrap();
        lib.load_str(WATER).unwrap();

        let indices: Vec<i32> = lib.sprites().iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);

        let drops = lib.emitter("Rain/Drops").unwrap();
        assert_eq!(lib.sprite_for(drops).unwrap().filename, "drop.png");
        let core = lib.emitter("Fire/Flame/Core").unwrap();
        assert_eq!(lib.sprite_for(core).unwrap().filename, "flame.png");
        assert_eq!(lib.effects().len(), 2);
    }

    #[test]
    fn test_explicit_offset() {
        let mut lib = EffectLibrary::new();
        let opts = LoadOptions { shape_offset: Some(100), ..LoadOptions::default() };
        lib.load_str_opts(WATER, &opts).unwrap();
        assert_eq!(lib.sprites()[0].index, 100);
        assert_eq!(lib.emitter("Rain/Drops").unwrap().sprite_index, Some(100));
    }

    #[test]
    fn test_failed_load_leaves_library_untouched() {
        let mut lib = EffectLibrary::new();
        lib.load_str(WATER).unwrap();

        assert!(matches!(lib.load_str("<NOPE/>"), Err(Error::MissingRoot)));
        assert_eq!(lib.last_error(), "Root element <EFFECTS> is missing");
        assert!(matches!(lib.load_str("<EFFECTS>"), Err(Error::Parse { .. })));
        assert!(lib.last_error().starts_with("Parsing error at #"));
        assert_eq!(lib.sprites().len(), 1);
        assert_eq!(lib.effects().len(), 1);

        lib.load_str(WATER).unwrap();
        assert_eq!(lib.last_error(), "");

        lib.clear();
        assert!(lib.is_empty());
    }
}
