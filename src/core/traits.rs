//! Abstract document access.
//!
//! The loader never touches a concrete markup parser. Anything tree-shaped
//! that can look up children and siblings by name and hand back attribute
//! text can back it; [`crate::xml`] provides the XML implementation.

use super::value::{parse_bool, parse_float, parse_int};

/// Handle to one element of a loaded document.
///
/// Handles are cheap to clone and borrow from the document they came from.
pub trait DocumentNode: Clone {
    /// Element name.
    fn tag_name(&self) -> &str;

    /// First child element with the given name.
    fn child_by_name(&self, name: &str) -> Option<Self>;

    /// Next sibling element (after this one) with the given name.
    fn next_sibling_by_name(&self, name: &str) -> Option<Self>;

    /// Raw attribute text, `None` when the attribute is absent.
    fn attribute(&self, name: &str) -> Option<&str>;

    /// Plain text content of the element, empty if there is none.
    fn text_value(&self) -> &str;

    /// String attribute, empty when absent.
    fn attribute_as_string(&self, name: &str) -> String {
        self.attribute(name).unwrap_or_default().to_string()
    }

    /// Integer attribute, 0 when absent or unreadable.
    fn attribute_as_int(&self, name: &str) -> i32 {
        self.attribute(name).map_or(0, parse_int)
    }

    /// Float attribute, 0.0 when absent or unreadable.
    fn attribute_as_float(&self, name: &str) -> f32 {
        self.attribute(name).map_or(0.0, parse_float)
    }

    /// Boolean attribute, false when absent.
    fn attribute_as_bool(&self, name: &str) -> bool {
        self.attribute(name).is_some_and(parse_bool)
    }

    /// All children named `name`, in document order.
    fn children_by_name<'n>(&self, name: &'n str) -> NamedSiblings<'n, Self> {
        NamedSiblings {
            next: self.child_by_name(name),
            name,
        }
    }
}

/// Iterator over same-named sibling elements.
pub struct NamedSiblings<'n, N> {
    next: Option<N>,
    name: &'n str,
}

impl<N: DocumentNode> Iterator for NamedSiblings<'_, N> {
    type Item = N;

    fn next(&mut self) -> Option<N> {
        let current = self.next.take()?;
        self.next = current.next_sibling_by_name(self.name);
        Some(current)
    }
}
