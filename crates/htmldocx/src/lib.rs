//! # htmldocx
//!
//! Convert HTML markup into a styled block document model.
//!
//! Conversion runs as a pipeline over a flat token stream:
//!
//! ```text
//! tokens ─▶ build ─▶ prune ─▶ resolve images (async) ─▶ render ─▶ blocks
//! ```
//!
//! The tree builder recovers nesting from start/end tags with a single
//! forward cursor, the pruner drops empty nodes, the resolver fetches and
//! measures every image concurrently, and the renderer flattens the tree into
//! ordered [`Block`]s while cascading bold, italic and background formatting.
//!
//! ## Design
//!
//! Nothing in the pipeline is fatal. Unknown tags, stray end tags and images
//! that fail to load are logged through `tracing` and degrade the output
//! instead of aborting it.
//!
//! ## Example (tokens)
//!
//! ```rust
//! use htmldocx::{Converter, Token};
//!
//! # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
//! let converter = Converter::new();
//! let blocks = converter
//!     .convert_tokens(vec![Token::start("p"), Token::chars("Hello World"), Token::end("p")])
//!     .await;
//! assert_eq!(blocks[0].text(), "Hello World");
//! # });
//! ```
//!
//! ## Example (HTML string)
//!
//! ```rust
//! use htmldocx::Converter;
//!
//! # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
//! let converter = Converter::new();
//! let blocks = converter.convert_html("<h1>Hello <em>World</em></h1>").await.unwrap();
//! assert_eq!(blocks[0].text(), "Hello World");
//! # });
//! ```

pub mod builder;
#[cfg(feature = "html")]
pub mod html;
pub mod node;
pub mod prune;
pub mod render;
pub mod resolve;
mod service;
mod token;
mod utilities;

pub use builder::{build, build_tree, TokenCursor};
#[cfg(feature = "html")]
pub use html::tokenize;
pub use htmldocx_core::{
    Block, Colour, Document, HeadingLevel, ImageRun, ImageSize, Run, Section, SectionChild,
    StyleSheet, TextRun,
};
pub use node::{AttributeSet, ImageNode, ParseNode, ResolvedImage, StructureNode, TextNode};
pub use prune::{prune, prune_all};
pub use render::{render, StyleContext};
pub use resolve::{resize, resolve_images, DefaultImageSource, ImageSource, ResolveError};
pub use service::{ConvertOptions, Converter};
pub use token::{Attribute, Token};

/// Error type for htmldocx operations
#[cfg(feature = "html")]
#[derive(Debug, thiserror::Error)]
pub enum HtmlDocxError {
    #[error("Tokenize error: {0}")]
    Tokenize(#[from] lol_html::errors::RewritingError),
}

#[cfg(feature = "html")]
pub type Result<T> = std::result::Result<T, HtmlDocxError>;
