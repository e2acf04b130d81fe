//! htmldocx-core - styled block document model
//!
//! This crate provides the output data structures of an HTML to document
//! conversion. It is produced by `htmldocx` and consumed by whatever
//! serializer writes the final paginated file.
//!
//! # Architecture
//!
//! ```text
//! Token stream ──▶ parse tree ──▶ ┌──────────────┐
//!                                 │ Block / Run  │ ──▶ Document serializer
//!                 Style sheet ──▶ │   Document   │
//!                                 └──────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use htmldocx_core::{Block, Document, HeadingLevel, Run, Section, StyleSheet, TextRun};
//!
//! let doc = Document {
//!     styles: StyleSheet::default(),
//!     sections: vec![Section::from_blocks(vec![
//!         Block::heading(HeadingLevel::H1, vec![Run::Text(TextRun::plain("Hello World"))]),
//!         Block::new(vec![
//!             Run::Text(TextRun::plain("This is ")),
//!             Run::Text(TextRun { text: "bold".to_string(), bold: true, ..Default::default() }),
//!         ]),
//!     ])],
//! };
//!
//! assert_eq!(doc.used_style_ids(), vec!["Heading1", "Normal"]);
//! ```

mod ast;
mod styles;

pub use ast::{
    Block, Colour, Document, HeadingLevel, ImageRun, ImageSize, Run, Section, SectionChild,
    TableOfContents, TextRun,
};
pub use styles::{ParagraphStyle, RunStyle, Spacing, StyleDefinition, StyleRole, StyleSheet};
