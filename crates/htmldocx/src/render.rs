//! Block renderer: flattens a pruned, resolved tree into ordered blocks.
//!
//! Formatting cascades top-down through a [`StyleContext`]; each structure
//! merges its own attributes over the inherited ones, closest ancestor
//! winning per field. List containers are the only nodes that deepen the
//! bullet level.

use htmldocx_core::{Block, Colour, ImageRun, Run, TextRun};
use smallvec::SmallVec;
use tracing::warn;

use crate::node::{AttributeSet, ImageNode, ParseNode, StructureNode};

// Most containers yield a handful of runs - avoid heap allocation
type RunVec = SmallVec<[Run; 4]>;

/// Inherited formatting threaded through the traversal
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StyleContext {
    pub bold: bool,
    pub italic: bool,
    pub background: Option<Colour>,
}

impl StyleContext {
    /// Layer a node's own attributes over this context
    pub fn merge(&self, own: &AttributeSet) -> StyleContext {
        StyleContext {
            bold: own.bold.unwrap_or(self.bold),
            italic: own.italic.unwrap_or(self.italic),
            background: own.background.clone().or_else(|| self.background.clone()),
        }
    }

    fn text_run(&self, content: &str) -> Run {
        Run::Text(TextRun {
            text: content.to_string(),
            bold: self.bold,
            italic: self.italic,
            background: self.background.clone(),
        })
    }
}

/// Render top-level nodes into a flat, order-preserving block sequence
pub fn render(nodes: &[ParseNode]) -> Vec<Block> {
    let context = StyleContext::default();
    nodes
        .iter()
        .flat_map(|node| to_blocks(node, None, &context))
        .collect()
}

/// Inline runs of a node under the given inherited style
pub fn to_runs(node: &ParseNode, inherited: &StyleContext) -> Vec<Run> {
    let mut runs = RunVec::new();
    collect_runs(node, inherited, &mut runs);
    runs.into_vec()
}

fn collect_runs(node: &ParseNode, inherited: &StyleContext, runs: &mut RunVec) {
    match node {
        ParseNode::Text(text) => runs.push(inherited.text_run(&text.content)),
        ParseNode::Image(image) => {
            if let Some(run) = image_run(image) {
                runs.push(run);
            }
        }
        ParseNode::Structure(structure) => {
            let context = inherited.merge(&structure.attributes);
            for child in &structure.children {
                collect_runs(child, &context, runs);
            }
        }
    }
}

fn image_run(image: &ImageNode) -> Option<Run> {
    match &image.resolved {
        Some(resolved) => Some(Run::Image(ImageRun {
            data: resolved.data.clone(),
            size: resolved.scaled,
        })),
        None => {
            warn!(src = %image.src, "attempted to render unloaded image");
            None
        }
    }
}

/// Blocks produced by a node at the given bullet depth.
///
/// `depth` is `None` outside any list.
pub fn to_blocks(node: &ParseNode, depth: Option<u8>, inherited: &StyleContext) -> Vec<Block> {
    match node {
        ParseNode::Text(_) | ParseNode::Image(_) => {
            vec![Block::new(to_runs(node, inherited)).with_bullet(depth)]
        }
        ParseNode::Structure(structure) => structure_blocks(structure, depth, inherited),
    }
}

fn structure_blocks(
    structure: &StructureNode,
    depth: Option<u8>,
    inherited: &StyleContext,
) -> Vec<Block> {
    let attributes = &structure.attributes;
    let context = inherited.merge(attributes);

    if attributes.is_block_boundary() {
        let mut runs = RunVec::new();
        for child in &structure.children {
            collect_runs(child, &context, &mut runs);
        }
        return vec![Block {
            runs: runs.into_vec(),
            heading: attributes.heading_level,
            bullet_level: depth,
        }];
    }

    let child_depth = if attributes.list {
        Some(depth.map_or(0, |d| d.saturating_add(1)))
    } else {
        depth
    };

    structure
        .children
        .iter()
        .flat_map(|child| to_blocks(child, child_depth, &context))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_tree;
    use crate::node::ResolvedImage;
    use crate::prune::prune_all;
    use crate::token::Token;
    use bytes::Bytes;
    use htmldocx_core::{HeadingLevel, ImageSize};

    fn render_tokens(tokens: Vec<Token>) -> Vec<Block> {
        render(&prune_all(build_tree(tokens)))
    }

    fn text_run(run: &Run) -> &TextRun {
        match run {
            Run::Text(text) => text,
            other => panic!("expected text run, got {other:?}"),
        }
    }

    #[test]
    fn test_paragraph_with_inline_emphasis() {
        let blocks = render_tokens(vec![
            Token::start("p"),
            Token::chars("plain "),
            Token::start("strong"),
            Token::chars("bold "),
            Token::start("em"),
            Token::chars("both"),
            Token::end("em"),
            Token::end("strong"),
            Token::end("p"),
        ]);

        assert_eq!(blocks.len(), 1);
        let runs = &blocks[0].runs;
        assert_eq!(runs.len(), 3);
        assert_eq!(text_run(&runs[0]), &TextRun::plain("plain "));
        let bold = text_run(&runs[1]);
        assert!(bold.bold && !bold.italic);
        let both = text_run(&runs[2]);
        assert!(both.bold && both.italic);
        assert_eq!(blocks[0].heading, None);
        assert_eq!(blocks[0].bullet_level, None);
    }

    #[test]
    fn test_heading_block() {
        let blocks = render_tokens(vec![
            Token::start("h2"),
            Token::chars("Title"),
            Token::end("h2"),
        ]);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].heading, Some(HeadingLevel::H2));
        assert_eq!(blocks[0].text(), "Title");
    }

    #[test]
    fn test_bullet_depth_increments_only_at_lists() {
        // <ul><li>a<ul><li>x</li></ul></li></ul>
        let blocks = render_tokens(vec![
            Token::start("ul"),
            Token::start("li"),
            Token::chars("a"),
            Token::start("ul"),
            Token::start("li"),
            Token::chars("x"),
            Token::end("li"),
            Token::end("ul"),
            Token::end("li"),
            Token::end("ul"),
        ]);

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].bullet_level, Some(0));
        assert_eq!(blocks[0].text(), "a");
        assert_eq!(blocks[1].bullet_level, Some(1));
        assert_eq!(blocks[1].text(), "x");
    }

    #[test]
    fn test_paragraph_in_list_item_keeps_depth() {
        let blocks = render_tokens(vec![
            Token::start("ol"),
            Token::start("li"),
            Token::start("p"),
            Token::chars("item"),
            Token::end("p"),
            Token::end("li"),
            Token::end("ol"),
        ]);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].bullet_level, Some(0));
        assert_eq!(blocks[0].style_id(), "ListParagraph");
    }

    #[test]
    fn test_transparent_containers_produce_no_block() {
        let blocks = render_tokens(vec![
            Token::start("div"),
            Token::start("div"),
            Token::start("p"),
            Token::chars("one"),
            Token::end("p"),
            Token::end("div"),
            Token::start("p"),
            Token::chars("two"),
            Token::end("p"),
            Token::end("div"),
        ]);
        let texts: Vec<_> = blocks.iter().map(Block::text).collect();
        assert_eq!(texts, vec!["one", "two"]);
    }

    #[test]
    fn test_bare_text_becomes_its_own_block() {
        let blocks = render_tokens(vec![
            Token::start("div"),
            Token::chars("loose"),
            Token::start("b"),
            Token::chars("bold"),
            Token::end("b"),
            Token::end("div"),
        ]);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].text(), "loose");
        assert!(text_run(&blocks[1].runs[0]).bold);
    }

    #[test]
    fn test_formatting_cascades_through_block_boundaries() {
        let blocks = render_tokens(vec![
            Token::start("b"),
            Token::start_with_attrs("div", vec![("style", "background-color: yellow")]),
            Token::start("p"),
            Token::chars("x"),
            Token::end("p"),
            Token::end("div"),
            Token::end("b"),
        ]);
        let run = text_run(&blocks[0].runs[0]);
        assert!(run.bold);
        assert_eq!(run.background.as_ref().map(Colour::hex), Some("FFFF00"));
    }

    #[test]
    fn test_closest_background_wins() {
        let context = StyleContext {
            background: Colour::parse("red"),
            ..Default::default()
        };
        let own = AttributeSet {
            background: Colour::parse("blue"),
            ..Default::default()
        };
        assert_eq!(context.merge(&own).background, Colour::parse("blue"));
        assert_eq!(
            context.merge(&AttributeSet::bold()).background,
            Colour::parse("red")
        );
    }

    #[test]
    fn test_heading_does_not_cascade_into_run_style() {
        let context = StyleContext {
            italic: true,
            ..Default::default()
        };
        let merged = context.merge(&AttributeSet::heading(HeadingLevel::H2));
        assert_eq!(merged, context);
    }

    #[test]
    fn test_nested_block_boundary_flattens_into_outer_block() {
        let blocks = render_tokens(vec![
            Token::start("h1"),
            Token::chars("a"),
            Token::start("p"),
            Token::chars("b"),
            Token::end("p"),
            Token::end("h1"),
        ]);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text(), "ab");
        assert_eq!(blocks[0].heading, Some(HeadingLevel::H1));
    }

    #[test]
    fn test_resolved_image_run() {
        let mut image = ParseNode::image("a.png");
        if let ParseNode::Image(node) = &mut image {
            node.resolved = Some(ResolvedImage {
                data: Bytes::from_static(b"png"),
                natural: Some(ImageSize::new(1200.0, 300.0)),
                scaled: ImageSize::new(600.0, 150.0),
            });
        }
        let tree = vec![ParseNode::container(
            AttributeSet::paragraph(),
            vec![ParseNode::text("see "), image],
        )];

        let blocks = render(&tree);
        assert_eq!(blocks.len(), 1);
        assert_eq!(
            blocks[0].runs[1],
            Run::Image(ImageRun {
                data: Bytes::from_static(b"png"),
                size: ImageSize::new(600.0, 150.0),
            })
        );
    }

    #[test]
    fn test_unresolved_image_renders_empty() {
        let tree = vec![
            ParseNode::image("lost.png"),
            ParseNode::container(
                AttributeSet::paragraph(),
                vec![ParseNode::image("lost.png"), ParseNode::text("caption")],
            ),
        ];

        let blocks = render(&tree);
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].is_empty());
        assert_eq!(blocks[1].runs.len(), 1);
        assert_eq!(blocks[1].text(), "caption");
    }
}
