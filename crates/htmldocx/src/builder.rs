//! Tree builder: rebuilds nested structure from a flat token stream.
//!
//! Tokens are consumed strictly forward through a single [`TokenCursor`]
//! shared by every recursive call, so each nested call resumes exactly where
//! the previous one stopped. Mismatched end tags are swallowed and
//! unrecognized start tags are dropped without skipping their content.

use htmldocx_core::HeadingLevel;
use tracing::{debug, warn};

use crate::node::{AttributeSet, ParseNode, StructureNode};
use crate::token::{attr, Attribute, Token};
use crate::utilities::background_from_style;

/// Forward-only position in a token stream
pub struct TokenCursor<I> {
    tokens: I,
    consumed: usize,
}

impl<I: Iterator<Item = Token>> TokenCursor<I> {
    pub fn new(tokens: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            tokens: tokens.into_iter(),
            consumed: 0,
        }
    }

    /// Number of tokens consumed so far
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.next()?;
        self.consumed += 1;
        Some(token)
    }
}

/// How a nesting level stopped consuming tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Exit {
    /// The expected end tag was consumed
    Closed,
    /// The stream ran out
    Exhausted,
}

/// Build the top-level node list of a whole token stream
pub fn build_tree(tokens: impl IntoIterator<Item = Token>) -> Vec<ParseNode> {
    let mut cursor = TokenCursor::new(tokens);
    build(&mut cursor, None)
}

/// Consume tokens until `expected_closing_tag` is closed or the stream ends.
///
/// With no expected tag the whole remaining stream is consumed.
pub fn build<I: Iterator<Item = Token>>(
    cursor: &mut TokenCursor<I>,
    expected_closing_tag: Option<&str>,
) -> Vec<ParseNode> {
    build_level(cursor, expected_closing_tag).0
}

fn build_level<I: Iterator<Item = Token>>(
    cursor: &mut TokenCursor<I>,
    expected_closing_tag: Option<&str>,
) -> (Vec<ParseNode>, Exit) {
    let mut nodes = Vec::new();

    while let Some(token) = cursor.advance() {
        match token {
            Token::Chars(text) => nodes.push(ParseNode::text(&text)),

            Token::StartTag {
                name,
                attributes,
                self_closing,
            } => {
                let Some(mut node) = create_node(&name, &attributes) else {
                    warn!(tag = %name, "skipping unrecognized tag");
                    continue;
                };

                if let ParseNode::Structure(structure) = &mut node {
                    if self_closing {
                        structure.closed = true;
                    } else {
                        open_child_context(cursor, &name, structure);
                    }
                }

                nodes.push(node);
            }

            Token::EndTag { name } => {
                if expected_closing_tag == Some(name.as_str()) {
                    debug!(tag = %name, "closing child context");
                    return (nodes, Exit::Closed);
                }
                warn!(
                    expected = expected_closing_tag.unwrap_or("<none>"),
                    received = %name,
                    "unexpected closing tag"
                );
            }
        }
    }

    (nodes, Exit::Exhausted)
}

fn open_child_context<I: Iterator<Item = Token>>(
    cursor: &mut TokenCursor<I>,
    name: &str,
    structure: &mut StructureNode,
) {
    debug!(tag = %name, "opening child context");
    let (children, exit) = build_level(cursor, Some(name));
    structure.children = children;
    structure.closed = exit == Exit::Closed;
    if !structure.closed {
        warn!(tag = %name, consumed = cursor.consumed(), "tag left open at end of stream");
    }
}

/// Map a tag to its node shape, `None` for unrecognized tags
fn create_node(name: &str, attributes: &[Attribute]) -> Option<ParseNode> {
    let mut attrs = match name {
        "h1" => AttributeSet::heading(HeadingLevel::H1),
        "h2" => AttributeSet::heading(HeadingLevel::H2),
        "h3" => AttributeSet::heading(HeadingLevel::H3),
        "h4" => AttributeSet::heading(HeadingLevel::H4),
        "h5" => AttributeSet::heading(HeadingLevel::H5),
        "p" => AttributeSet::paragraph(),
        "li" | "div" | "span" => AttributeSet::default(),
        "strong" | "b" => AttributeSet::bold(),
        "i" | "em" => AttributeSet::italic(),
        "ul" | "ol" => AttributeSet::list(),
        "img" => return Some(ParseNode::image(attr(attributes, "src").unwrap_or_default())),
        _ => return None,
    };

    attrs.background = attr(attributes, "style").and_then(background_from_style);
    Some(ParseNode::structure(attrs))
}
