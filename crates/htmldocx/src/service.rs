//! Converter - the main entry point for HTML to document conversion.

use std::time::Duration;

use htmldocx_core::{
    Block, Document, ImageSize, Section, StyleSheet, TableOfContents,
};
use tracing::debug;

use crate::builder::build_tree;
use crate::node::ParseNode;
use crate::prune::prune_all;
use crate::render::render;
use crate::resolve::{
    resolve_images, DefaultImageSource, ImageSource, ResolveOptions, DEFAULT_MAX_IMAGE_SIZE,
    FALLBACK_IMAGE_SIZE,
};
use crate::token::Token;
#[cfg(feature = "html")]
use crate::Result;

/// Options for Converter
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Bounding box images are scaled into
    pub max_image_size: ImageSize,

    /// Size used for images whose dimensions cannot be read
    pub fallback_image_size: ImageSize,

    /// Per-image limit on fetching and measuring, `None` waits forever
    pub image_timeout: Option<Duration>,

    /// Prepend a table-of-contents section to converted documents
    pub table_of_contents: bool,

    /// Style definitions declared in converted documents
    pub styles: StyleSheet,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            max_image_size: DEFAULT_MAX_IMAGE_SIZE,
            fallback_image_size: FALLBACK_IMAGE_SIZE,
            image_timeout: Some(Duration::from_secs(30)),
            table_of_contents: true,
            styles: StyleSheet::default(),
        }
    }
}

impl ConvertOptions {
    fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            max_size: self.max_image_size,
            fallback_size: self.fallback_image_size,
            timeout: self.image_timeout,
        }
    }
}

/// The main service for converting HTML to styled blocks
pub struct Converter<S = DefaultImageSource> {
    options: ConvertOptions,
    source: S,
}

impl Converter {
    /// Create a Converter with default options loading images from the network or disk
    pub fn new() -> Self {
        Self::with_options(ConvertOptions::default())
    }

    /// Create a Converter with custom options
    pub fn with_options(options: ConvertOptions) -> Self {
        Self {
            options,
            source: DefaultImageSource::new(),
        }
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ImageSource> Converter<S> {
    /// Create a Converter that loads images through `source`
    pub fn with_source(options: ConvertOptions, source: S) -> Self {
        Self { options, source }
    }

    /// Get the current options
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Get mutable access to options
    pub fn options_mut(&mut self) -> &mut ConvertOptions {
        &mut self.options
    }

    /// Build and prune the parse tree of a token stream
    pub fn parse_tokens(&self, tokens: impl IntoIterator<Item = Token>) -> Vec<ParseNode> {
        prune_all(build_tree(tokens))
    }

    /// Tokenize, build and prune the parse tree of an HTML string
    #[cfg(feature = "html")]
    pub fn parse_html(&self, html: &str) -> Result<Vec<ParseNode>> {
        let tokens = crate::html::tokenize(html)?;
        debug!(tokens = tokens.len(), "tokenized html");
        Ok(self.parse_tokens(tokens))
    }

    /// Convert a token stream into blocks, resolving every image first
    pub async fn convert_tokens(&self, tokens: impl IntoIterator<Item = Token>) -> Vec<Block> {
        let tree = self.parse_tokens(tokens);
        self.render_tree(tree).await
    }

    /// Convert an HTML string into blocks, resolving every image first
    #[cfg(feature = "html")]
    pub async fn convert_html(&self, html: &str) -> Result<Vec<Block>> {
        let tree = self.parse_html(html)?;
        Ok(self.render_tree(tree).await)
    }

    /// Convert an HTML string into a single content section
    #[cfg(feature = "html")]
    pub async fn section(&self, html: &str) -> Result<Section> {
        Ok(Section::from_blocks(self.convert_html(html).await?))
    }

    /// Convert an HTML string into a complete document
    #[cfg(feature = "html")]
    pub async fn document(&self, html: &str) -> Result<Document> {
        let content = self.section(html).await?;
        Ok(self.wrap(content))
    }

    /// Wrap a content section with the style sheet and optional table of contents
    pub fn wrap(&self, content: Section) -> Document {
        let mut sections = Vec::with_capacity(2);
        if self.options.table_of_contents {
            sections.push(Section::table_of_contents(TableOfContents::default()));
        }
        sections.push(content);

        Document {
            styles: self.options.styles.clone(),
            sections,
        }
    }

    async fn render_tree(&self, tree: Vec<ParseNode>) -> Vec<Block> {
        let resolved = resolve_images(tree, &self.source, &self.options.resolve_options()).await;
        let blocks = render(&resolved);
        debug!(blocks = blocks.len(), "rendered blocks");
        blocks
    }
}
