//! Bottom-up removal of empty nodes.

use crate::node::ParseNode;
use crate::utilities::is_blank;

/// Prune a single node: it either survives (possibly rewritten) or is dropped.
///
/// Text survives when it has visible content; the stored content is kept
/// untrimmed. Images survive when they have a source. Structures survive when
/// at least one child survives, whatever their attributes.
pub fn prune(node: ParseNode) -> Option<ParseNode> {
    match node {
        ParseNode::Text(text) => (!is_blank(&text.content)).then_some(ParseNode::Text(text)),
        ParseNode::Image(image) => (!image.src.is_empty()).then_some(ParseNode::Image(image)),
        ParseNode::Structure(mut structure) => {
            structure.children = prune_all(std::mem::take(&mut structure.children));
            (!structure.children.is_empty()).then_some(ParseNode::Structure(structure))
        }
    }
}

/// Prune every node of a list, keeping sibling order
pub fn prune_all(nodes: Vec<ParseNode>) -> Vec<ParseNode> {
    nodes.into_iter().filter_map(prune).collect()
}
