//! Parse tree built from the token stream.
//!
//! A [`ParseNode`] is either a structure (any container-producing tag), a
//! text leaf, or an image leaf. Structures carry an [`AttributeSet`] that
//! cascades down to their descendants at render time.

use bytes::Bytes;
use htmldocx_core::{Colour, HeadingLevel, ImageSize};

/// Recognized formatting flags of a structure node.
///
/// Only the fields a tag actually sets are `Some`/`true`; unset fields leave
/// inherited values untouched when cascading.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttributeSet {
    pub heading_level: Option<HeadingLevel>,
    pub paragraph: bool,
    pub list: bool,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub background: Option<Colour>,
}

impl AttributeSet {
    pub fn heading(level: HeadingLevel) -> Self {
        Self {
            heading_level: Some(level),
            ..Default::default()
        }
    }

    pub fn paragraph() -> Self {
        Self {
            paragraph: true,
            ..Default::default()
        }
    }

    pub fn list() -> Self {
        Self {
            list: true,
            ..Default::default()
        }
    }

    pub fn bold() -> Self {
        Self {
            bold: Some(true),
            ..Default::default()
        }
    }

    pub fn italic() -> Self {
        Self {
            italic: Some(true),
            ..Default::default()
        }
    }

    /// Check if this set produces its own block
    pub fn is_block_boundary(&self) -> bool {
        self.heading_level.is_some() || self.paragraph
    }
}

/// A container node and its children in document order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StructureNode {
    pub children: Vec<ParseNode>,
    pub attributes: AttributeSet,
    pub closed: bool,
}

/// Literal character data
#[derive(Debug, Clone, PartialEq)]
pub struct TextNode {
    pub content: String,
    pub closed: bool,
}

/// Fetched image data with its measured and display sizes
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedImage {
    pub data: Bytes,
    /// Intrinsic pixel size, `None` when measuring failed
    pub natural: Option<ImageSize>,
    /// Size to render at
    pub scaled: ImageSize,
}

/// A reference to an external image resource
#[derive(Debug, Clone, PartialEq)]
pub struct ImageNode {
    pub src: String,
    pub resolved: Option<ResolvedImage>,
    pub closed: bool,
}

/// A node of the parse tree
#[derive(Debug, Clone, PartialEq)]
pub enum ParseNode {
    Structure(StructureNode),
    Text(TextNode),
    Image(ImageNode),
}

impl ParseNode {
    /// Create an open structure node
    pub fn structure(attributes: AttributeSet) -> Self {
        ParseNode::Structure(StructureNode {
            children: Vec::new(),
            attributes,
            closed: false,
        })
    }

    /// Create a closed structure node with the given children
    pub fn container(attributes: AttributeSet, children: Vec<ParseNode>) -> Self {
        ParseNode::Structure(StructureNode {
            children,
            attributes,
            closed: true,
        })
    }

    pub fn text(content: &str) -> Self {
        ParseNode::Text(TextNode {
            content: content.to_string(),
            closed: true,
        })
    }

    pub fn image(src: &str) -> Self {
        ParseNode::Image(ImageNode {
            src: src.to_string(),
            resolved: None,
            closed: true,
        })
    }

    pub fn is_structure(&self) -> bool {
        matches!(self, ParseNode::Structure(_))
    }

    pub fn is_closed(&self) -> bool {
        match self {
            ParseNode::Structure(node) => node.closed,
            ParseNode::Text(node) => node.closed,
            ParseNode::Image(node) => node.closed,
        }
    }

    /// Children of a structure, empty for leaves
    pub fn children(&self) -> &[ParseNode] {
        match self {
            ParseNode::Structure(node) => &node.children,
            _ => &[],
        }
    }

    /// Number of text and image leaves below (or at) this node
    pub fn leaf_count(&self) -> usize {
        match self {
            ParseNode::Structure(node) => node.children.iter().map(ParseNode::leaf_count).sum(),
            ParseNode::Text(_) | ParseNode::Image(_) => 1,
        }
    }

    /// Visit every image leaf depth-first in document order
    pub fn for_each_image<'a>(&'a self, f: &mut impl FnMut(&'a ImageNode)) {
        match self {
            ParseNode::Structure(node) => {
                for child in &node.children {
                    child.for_each_image(f);
                }
            }
            ParseNode::Image(image) => f(image),
            ParseNode::Text(_) => {}
        }
    }

    /// Mutable counterpart of [`ParseNode::for_each_image`], same order
    pub fn for_each_image_mut(&mut self, f: &mut impl FnMut(&mut ImageNode)) {
        match self {
            ParseNode::Structure(node) => {
                for child in &mut node.children {
                    child.for_each_image_mut(f);
                }
            }
            ParseNode::Image(image) => f(image),
            ParseNode::Text(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ParseNode {
        ParseNode::container(
            AttributeSet::paragraph(),
            vec![
                ParseNode::image("a.png"),
                ParseNode::container(
                    AttributeSet::bold(),
                    vec![ParseNode::text("x"), ParseNode::image("b.png")],
                ),
                ParseNode::image("c.png"),
            ],
        )
    }

    #[test]
    fn test_leaf_count() {
        assert_eq!(sample().leaf_count(), 4);
        assert_eq!(ParseNode::container(AttributeSet::list(), vec![]).leaf_count(), 0);
    }

    #[test]
    fn test_image_visit_order() {
        let tree = sample();
        let mut srcs = Vec::new();
        tree.for_each_image(&mut |image| srcs.push(image.src.as_str()));
        assert_eq!(srcs, vec!["a.png", "b.png", "c.png"]);
    }

    #[test]
    fn test_image_visit_mut_matches_order() {
        let mut tree = sample();
        let mut index = 0;
        tree.for_each_image_mut(&mut |image| {
            image.src = format!("{index}-{}", image.src);
            index += 1;
        });
        let mut srcs = Vec::new();
        tree.for_each_image(&mut |image| srcs.push(image.src.clone()));
        assert_eq!(srcs, vec!["0-a.png", "1-b.png", "2-c.png"]);
    }

    #[test]
    fn test_block_boundary() {
        assert!(AttributeSet::heading(HeadingLevel::H2).is_block_boundary());
        assert!(AttributeSet::paragraph().is_block_boundary());
        assert!(!AttributeSet::list().is_block_boundary());
        assert!(!AttributeSet::bold().is_block_boundary());
    }
}
