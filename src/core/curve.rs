//! Keyframed attribute curves.
//!
//! Every animatable property of an effect or emitter is an [`AttributeCurve`]:
//! an append-only list of [`Keyframe`]s in the order the document declared
//! them. Curves are grouped per descriptor in a [`CurveTable`] keyed by a
//! closed set of categories (see [`AttributeKey`]).

use std::fmt;
use std::marker::PhantomData;

use crate::util::Vec2;

/// Bezier tangent handles of a keyframe.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TangentHandle {
    pub left: Vec2,
    pub right: Vec2,
}

impl TangentHandle {
    /// Create from the four handle coordinates.
    #[inline]
    pub fn new(left_x: f32, left_y: f32, right_x: f32, right_y: f32) -> Self {
        Self {
            left: Vec2::new(left_x, left_y),
            right: Vec2::new(right_x, right_y),
        }
    }
}

/// A single `(frame, value)` sample.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Keyframe {
    pub frame: f32,
    pub value: f32,
    /// `None` means linear interpolation into the next key.
    pub handle: Option<TangentHandle>,
}

impl Keyframe {
    #[inline]
    pub fn new(frame: f32, value: f32) -> Self {
        Self { frame, value, handle: None }
    }

    /// Check if the keyframe carries Bezier handles.
    #[inline]
    pub fn is_smoothed(&self) -> bool {
        self.handle.is_some()
    }

    /// Replace the tangent handles. Later calls overwrite earlier ones.
    #[inline]
    pub fn set_handle(&mut self, handle: TangentHandle) {
        self.handle = Some(handle);
    }
}

/// Ordered keyframe sequence of one attribute category.
///
/// No sorting or deduplication is ever applied; frames appear exactly as
/// the document listed them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttributeCurve {
    keys: Vec<Keyframe>,
}

impl AttributeCurve {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a keyframe and return it for further editing.
    pub fn push(&mut self, frame: f32, value: f32) -> &mut Keyframe {
        self.keys.push(Keyframe::new(frame, value));
        let last = self.keys.len() - 1;
        &mut self.keys[last]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    #[inline]
    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Keyframe> {
        self.keys.iter()
    }

    /// Most recently appended keyframe.
    #[inline]
    pub fn last(&self) -> Option<&Keyframe> {
        self.keys.last()
    }

    /// Largest frame number present (curves are unsorted).
    pub fn max_frame(&self) -> Option<f32> {
        self.keys.iter().map(|k| k.frame).reduce(f32::max)
    }
}

impl<'a> IntoIterator for &'a AttributeCurve {
    type Item = &'a Keyframe;
    type IntoIter = std::slice::Iter<'a, Keyframe>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}

/// A closed set of attribute categories.
pub trait AttributeKey: Copy + Eq + fmt::Debug + 'static {
    /// Every category, in declaration order.
    const ALL: &'static [Self];

    /// Document element name of the category.
    fn tag(self) -> &'static str;

    /// Position of the category inside [`Self::ALL`].
    fn index(self) -> usize;

    /// Whether keyframes of this category take Bezier handles.
    fn accepts_handles(self) -> bool {
        true
    }

    /// Look a category up by its element name.
    fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.tag() == tag)
    }
}

/// Per-descriptor map from category to curve.
#[derive(Clone, PartialEq)]
pub struct CurveTable<K: AttributeKey> {
    curves: Vec<AttributeCurve>,
    _keys: PhantomData<K>,
}

impl<K: AttributeKey> CurveTable<K> {
    pub fn new() -> Self {
        Self {
            curves: vec![AttributeCurve::new(); K::ALL.len()],
            _keys: PhantomData,
        }
    }

    #[inline]
    pub fn get(&self, key: K) -> &AttributeCurve {
        &self.curves[key.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, key: K) -> &mut AttributeCurve {
        &mut self.curves[key.index()]
    }

    /// Append a keyframe to the curve of `key`.
    #[inline]
    pub fn push(&mut self, key: K, frame: f32, value: f32) -> &mut Keyframe {
        self.get_mut(key).push(frame, value)
    }

    /// Curves that hold at least one keyframe.
    pub fn iter(&self) -> impl Iterator<Item = (K, &AttributeCurve)> + '_ {
        K::ALL
            .iter()
            .copied()
            .zip(self.curves.iter())
            .filter(|(_, c)| !c.is_empty())
    }

    /// Total keyframes over all categories.
    pub fn num_keys(&self) -> usize {
        self.curves.iter().map(AttributeCurve::len).sum()
    }
}

impl<K: AttributeKey> Default for CurveTable<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: AttributeKey> fmt::Debug for CurveTable<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(k, c)| (k.tag(), c.len())))
            .finish()
    }
}
