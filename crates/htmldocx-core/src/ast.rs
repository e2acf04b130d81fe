//! Styled block document model
//!
//! This module defines the output side of a conversion: a flat, ordered
//! sequence of paragraph-like blocks made of inline runs, and the
//! section/document wrapper handed to a document serializer.

use std::ops::RangeInclusive;

use bytes::Bytes;

use crate::styles::StyleSheet;

/// Heading level of a block (1-5)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
    H4,
    H5,
}

impl HeadingLevel {
    /// Declared style name consumed by blocks of this level
    pub fn style_id(self) -> &'static str {
        match self {
            HeadingLevel::H1 => "Heading1",
            HeadingLevel::H2 => "Heading2",
            HeadingLevel::H3 => "Heading3",
            HeadingLevel::H4 => "Heading4",
            HeadingLevel::H5 => "Heading5",
        }
    }
}

/// An RGB colour stored as six uppercase hex digits without the leading `#`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Colour(String);

impl Colour {
    /// Parse `#rgb`, `#rrggbb` or a basic named colour
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();

        if let Some(hex) = value.strip_prefix('#') {
            if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return None;
            }
            return match hex.len() {
                3 => Some(Colour(
                    hex.chars()
                        .flat_map(|c| [c, c])
                        .collect::<String>()
                        .to_ascii_uppercase(),
                )),
                6 => Some(Colour(hex.to_ascii_uppercase())),
                _ => None,
            };
        }

        let hex = match value.to_ascii_lowercase().as_str() {
            "black" => "000000",
            "white" => "FFFFFF",
            "red" => "FF0000",
            "green" => "008000",
            "lime" => "00FF00",
            "blue" => "0000FF",
            "yellow" => "FFFF00",
            "cyan" | "aqua" => "00FFFF",
            "magenta" | "fuchsia" => "FF00FF",
            "gray" | "grey" => "808080",
            "silver" => "C0C0C0",
            "maroon" => "800000",
            "olive" => "808000",
            "navy" => "000080",
            "purple" => "800080",
            "teal" => "008080",
            "orange" => "FFA500",
            _ => return None,
        };
        Some(Colour(hex.to_string()))
    }

    /// Hex digits, e.g. `"041E42"`
    pub fn hex(&self) -> &str {
        &self.0
    }
}

/// Width and height in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageSize {
    pub width: f64,
    pub height: f64,
}

impl ImageSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// A styled text span
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextRun {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub background: Option<Colour>,
}

impl TextRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

/// An embedded image with its final data and display size
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRun {
    pub data: Bytes,
    pub size: ImageSize,
}

/// An inline unit inside a block
#[derive(Debug, Clone, PartialEq)]
pub enum Run {
    Text(TextRun),
    Image(ImageRun),
}

impl Run {
    /// Text of a text run, empty for images
    pub fn text(&self) -> &str {
        match self {
            Run::Text(run) => &run.text,
            Run::Image(_) => "",
        }
    }
}

/// One paragraph-equivalent unit of output
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub runs: Vec<Run>,
    pub heading: Option<HeadingLevel>,
    /// List nesting level, `None` outside any list
    pub bullet_level: Option<u8>,
}

impl Block {
    pub fn new(runs: Vec<Run>) -> Self {
        Self {
            runs,
            ..Default::default()
        }
    }

    pub fn heading(level: HeadingLevel, runs: Vec<Run>) -> Self {
        Self {
            runs,
            heading: Some(level),
            bullet_level: None,
        }
    }

    pub fn with_bullet(mut self, level: Option<u8>) -> Self {
        self.bullet_level = level;
        self
    }

    /// Concatenated text of all text runs
    pub fn text(&self) -> String {
        self.runs.iter().map(Run::text).collect()
    }

    /// Check if this block renders nothing
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Declared style name this block consumes.
    ///
    /// Headings win over bullets; a heading inside a list keeps its heading
    /// style and only gains the bullet numbering.
    pub fn style_id(&self) -> &'static str {
        match (self.heading, self.bullet_level) {
            (Some(level), _) => level.style_id(),
            (None, Some(_)) => "ListParagraph",
            (None, None) => "Normal",
        }
    }
}

/// A table-of-contents field
#[derive(Debug, Clone, PartialEq)]
pub struct TableOfContents {
    pub title: String,
    pub heading_range: RangeInclusive<u8>,
    pub hyperlink: bool,
}

impl Default for TableOfContents {
    fn default() -> Self {
        Self {
            title: "Table of Contents".to_string(),
            heading_range: 1..=3,
            hyperlink: true,
        }
    }
}

/// Content of a section
#[derive(Debug, Clone, PartialEq)]
pub enum SectionChild {
    Block(Block),
    TableOfContents(TableOfContents),
}

/// A run of content sharing one page setup, starting on a new page
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Section {
    pub children: Vec<SectionChild>,
}

impl Section {
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        Self {
            children: blocks.into_iter().map(SectionChild::Block).collect(),
        }
    }

    /// A section holding a heading-1 title followed by the field itself
    pub fn table_of_contents(toc: TableOfContents) -> Self {
        let title = Block::heading(HeadingLevel::H1, vec![Run::Text(TextRun::plain(&toc.title))]);
        Self {
            children: vec![
                SectionChild::Block(title),
                SectionChild::TableOfContents(toc),
            ],
        }
    }

    /// Blocks of this section in order, skipping fields
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.children.iter().filter_map(|child| match child {
            SectionChild::Block(block) => Some(block),
            SectionChild::TableOfContents(_) => None,
        })
    }
}

/// A complete document ready for serialization
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub styles: StyleSheet,
    pub sections: Vec<Section>,
}

impl Document {
    /// Style names consumed by the blocks of this document, first use first
    pub fn used_style_ids(&self) -> Vec<&'static str> {
        let mut used = Vec::new();
        for block in self.sections.iter().flat_map(Section::blocks) {
            let id = block.style_id();
            if !used.contains(&id) {
                used.push(id);
            }
        }
        used
    }
}
