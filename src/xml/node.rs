//! roxmltree-backed document access.

use crate::core::DocumentNode;
use crate::util::{Error, Result};

/// A parsed XML effect library document.
pub struct XmlDocument<'input> {
    doc: roxmltree::Document<'input>,
}

impl<'input> XmlDocument<'input> {
    /// Parse document text.
    ///
    /// Malformed markup is reported as [`Error::Parse`] with the byte offset
    /// of the failure.
    pub fn parse(text: &'input str) -> Result<Self> {
        let options = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..roxmltree::ParsingOptions::default()
        };
        let doc = roxmltree::Document::parse_with_options(text, options).map_err(|e| {
            let offset = text_pos_to_offset(text, e.pos());
            Error::parse(offset, e.to_string())
        })?;
        Ok(Self { doc })
    }

    /// The document node, parent of the root element.
    pub fn root(&self) -> XmlNode<'_, 'input> {
        XmlNode(self.doc.root())
    }
}

/// Element handle inside an [`XmlDocument`].
#[derive(Clone, Copy, Debug)]
pub struct XmlNode<'a, 'input>(roxmltree::Node<'a, 'input>);

impl<'a, 'input> XmlNode<'a, 'input> {
    /// Underlying roxmltree node.
    pub fn inner(&self) -> roxmltree::Node<'a, 'input> {
        self.0
    }

    fn is_named(node: &roxmltree::Node<'_, '_>, name: &str) -> bool {
        node.is_element() && node.tag_name().name() == name
    }
}

impl DocumentNode for XmlNode<'_, '_> {
    fn tag_name(&self) -> &str {
        self.0.tag_name().name()
    }

    fn child_by_name(&self, name: &str) -> Option<Self> {
        self.0.children().find(|n| Self::is_named(n, name)).map(XmlNode)
    }

    fn next_sibling_by_name(&self, name: &str) -> Option<Self> {
        self.0
            .next_siblings()
            .skip(1)
            .find(|n| Self::is_named(n, name))
            .map(XmlNode)
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.0.attribute(name)
    }

    fn text_value(&self) -> &str {
        self.0.text().unwrap_or_default()
    }
}

/// Convert a 1-based row/column (in characters) to a byte offset.
fn text_pos_to_offset(text: &str, pos: roxmltree::TextPos) -> usize {
    let row = pos.row.max(1) as usize;
    let col = pos.col.max(1) as usize;

    let line_start = if row == 1 {
        0
    } else {
        text.match_indices('\n')
            .nth(row - 2)
            .map_or(text.len(), |(i, _)| i + 1)
    };

    text[line_start..]
        .char_indices()
        .nth(col - 1)
        .map_or(text.len(), |(i, _)| line_start + i)
}
