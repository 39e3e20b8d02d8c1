//! Pull-based enumeration of shapes and effects from one document.
//!
//! A loader holds three cursors (shape, folder, effect) into the document
//! it was opened on. Callers first drain shapes with
//! [`EffectLoader::next_shape`], then drain effects with
//! [`EffectLoader::next_effect`], handing back the accumulated sprite set so
//! emitters can resolve their shapes.
//!
//! ```ignore
//! let source = XmlSource::open("library.xml")?;
//! let doc = source.parse()?;
//! let mut loader = EffectLoader::new(0);
//! loader.open(doc.root())?;
//!
//! let mut sprites = Vec::new();
//! while let Ok(shape) = loader.next_shape() {
//!     sprites.push(shape);
//! }
//! while let Ok(effect) = loader.next_effect(&sprites) {
//!     println!("{}", effect.path);
//! }
//! ```

use crate::core::{DocumentNode, SpriteDescriptor};
use crate::effect::{build_effect, BuildContext, EffectDescriptor, EFFECT_TAG};
use crate::util::{Error, Result};

/// Root container of an effect library document.
pub const ROOT_TAG: &str = "EFFECTS";
const SHAPES_TAG: &str = "SHAPES";
const IMAGE_TAG: &str = "IMAGE";
const FOLDER_TAG: &str = "FOLDER";

/// How effects are laid out in the opened document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectLayout {
    /// Effects live in `<FOLDER>` containers.
    Folders,
    /// Effects are direct children of the root.
    Flat,
}

/// Stateful reader over one document.
///
/// One loader must be driven by one caller at a time; separate loaders over
/// separate documents are independent.
#[derive(Debug)]
pub struct EffectLoader<N> {
    shape_offset: i32,
    layout: Option<EffectLayout>,
    current_shape: Option<N>,
    current_folder: Option<N>,
    current_effect: Option<N>,
    last_error: String,
}

impl<N: DocumentNode> EffectLoader<N> {
    /// Create a loader whose shape indices are shifted by `shape_offset`.
    pub fn new(shape_offset: i32) -> Self {
        Self {
            shape_offset,
            layout: None,
            current_shape: None,
            current_folder: None,
            current_effect: None,
            last_error: String::new(),
        }
    }

    /// Position the cursors on a document.
    ///
    /// `document` is the node whose child is the `<EFFECTS>` root. Folder
    /// mode is chosen here, once: if any folder holds an effect, only
    /// folders are enumerated for the rest of the session.
    pub fn open(&mut self, document: N) -> Result<()> {
        self.reset();

        let Some(root) = document.child_by_name(ROOT_TAG) else {
            return self.fail(Error::MissingRoot);
        };

        self.current_shape = root
            .child_by_name(SHAPES_TAG)
            .and_then(|shapes| shapes.child_by_name(IMAGE_TAG));

        let mut folder = root.child_by_name(FOLDER_TAG);
        while let Some(f) = folder {
            if let Some(effect) = f.child_by_name(EFFECT_TAG) {
                self.current_folder = Some(f);
                self.current_effect = Some(effect);
                break;
            }
            folder = f.next_sibling_by_name(FOLDER_TAG);
        }

        let layout = if self.current_effect.is_some() {
            EffectLayout::Folders
        } else {
            self.current_effect = root.child_by_name(EFFECT_TAG);
            EffectLayout::Flat
        };
        self.layout = Some(layout);

        tracing::debug!(
            ?layout,
            has_shapes = self.current_shape.is_some(),
            has_effects = self.current_effect.is_some(),
            "opened effect library"
        );
        Ok(())
    }

    /// Open the outcome of parsing a document.
    ///
    /// A parse failure is recorded like any other open failure, so
    /// [`Self::last_error`] reports it and the previous session is dropped.
    ///
    /// ```ignore
    /// let parsed = XmlDocument::parse(text);
    /// loader.open_parsed(parsed.as_ref().map(XmlDocument::root).map_err(Error::clone))?;
    /// ```
    pub fn open_parsed(&mut self, document: Result<N>) -> Result<()> {
        match document {
            Ok(document) => self.open(document),
            Err(err) => {
                self.reset();
                self.fail(err)
            }
        }
    }

    /// Pull the next shape declaration.
    pub fn next_shape(&mut self) -> Result<SpriteDescriptor> {
        self.last_error.clear();

        let Some(node) = self.current_shape.take() else {
            return self.fail(Error::NoMoreShapes);
        };

        let shape = SpriteDescriptor::new(
            node.attribute_as_string("URL"),
            node.attribute_as_float("WIDTH"),
            node.attribute_as_float("HEIGHT"),
            node.attribute_as_int("FRAMES"),
            node.attribute_as_int("INDEX").wrapping_add(self.shape_offset),
            node.attribute_as_float("MAX_RADIUS"),
        );

        self.current_shape = node.next_sibling_by_name(IMAGE_TAG);
        tracing::trace!(file = %shape.filename, index = shape.index, "loaded shape");
        Ok(shape)
    }

    /// Pull and fully build the next effect.
    ///
    /// `sprites` is the merged sprite set emitter shapes are resolved against.
    pub fn next_effect(&mut self, sprites: &[SpriteDescriptor]) -> Result<EffectDescriptor> {
        self.last_error.clear();

        let Some(node) = self.current_effect.take() else {
            return self.fail(Error::NoMoreEffects);
        };

        let folder_name = self
            .current_folder
            .as_ref()
            .map(|f| f.attribute_as_string("NAME"))
            .unwrap_or_default();
        let ctx = BuildContext::new(sprites, self.shape_offset);
        let effect = build_effect(&node, &ctx, None, &folder_name);

        self.current_effect = node.next_sibling_by_name(EFFECT_TAG);
        if self.current_effect.is_none() {
            self.advance_folder();
        }
        Ok(effect)
    }

    /// Move to the first effect of the next non-empty folder.
    fn advance_folder(&mut self) {
        let mut folder = self
            .current_folder
            .take()
            .and_then(|f| f.next_sibling_by_name(FOLDER_TAG));
        while let Some(f) = folder {
            if let Some(effect) = f.child_by_name(EFFECT_TAG) {
                self.current_folder = Some(f);
                self.current_effect = Some(effect);
                return;
            }
            folder = f.next_sibling_by_name(FOLDER_TAG);
        }
    }

    /// Diagnostic of the last failed call, empty if it succeeded.
    #[inline]
    pub fn last_error(&self) -> &str {
        &self.last_error
    }

    /// Layout chosen at open time, `None` before a successful open.
    #[inline]
    pub fn layout(&self) -> Option<EffectLayout> {
        self.layout
    }

    /// Merge offset applied to every shape index of this session.
    #[inline]
    pub fn shape_offset(&self) -> i32 {
        self.shape_offset
    }

    /// Check if more shapes remain.
    #[inline]
    pub fn has_shapes(&self) -> bool {
        self.current_shape.is_some()
    }

    /// Check if more effects remain.
    #[inline]
    pub fn has_effects(&self) -> bool {
        self.current_effect.is_some()
    }

    /// Drain the remaining shapes.
    pub fn shapes(&mut self) -> impl Iterator<Item = SpriteDescriptor> + '_ {
        std::iter::from_fn(move || self.next_shape().ok())
    }

    fn reset(&mut self) {
        self.layout = None;
        self.current_shape = None;
        self.current_folder = None;
        self.current_effect = None;
        self.last_error.clear();
    }

    fn fail<T>(&mut self, err: Error) -> Result<T> {
        self.last_error = err.to_string();
        Err(err)
    }
}
