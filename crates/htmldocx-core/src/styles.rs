//! Named style definitions handed to the document serializer

use indexmap::IndexMap;

use crate::ast::{Colour, HeadingLevel};

/// The role a style definition plays in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleRole {
    /// Default body text
    Document,
    Title,
    Heading(HeadingLevel),
    ListParagraph,
}

impl StyleRole {
    /// Declared style name
    pub fn style_id(self) -> &'static str {
        match self {
            StyleRole::Document => "Normal",
            StyleRole::Title => "Title",
            StyleRole::Heading(level) => level.style_id(),
            StyleRole::ListParagraph => "ListParagraph",
        }
    }
}

/// Character formatting
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunStyle {
    pub font: Option<String>,
    /// Font size in half-points
    pub size: Option<u32>,
    pub bold: Option<bool>,
    pub colour: Option<Colour>,
}

/// Paragraph spacing in twentieths of a point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Spacing {
    pub before: Option<u32>,
    pub after: Option<u32>,
    /// 240 is single line spacing
    pub line: Option<u32>,
}

/// Paragraph formatting
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParagraphStyle {
    pub spacing: Spacing,
    /// Horizontal rule below the paragraph
    pub thematic_break: bool,
    /// Drop spacing between paragraphs of the same style
    pub contextual_spacing: bool,
}

/// A single named style
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StyleDefinition {
    pub run: RunStyle,
    pub paragraph: ParagraphStyle,
    pub based_on: Option<String>,
}

/// Style definitions keyed by role, in declaration order
#[derive(Debug, Clone, PartialEq)]
pub struct StyleSheet {
    styles: IndexMap<StyleRole, StyleDefinition>,
}

impl StyleSheet {
    /// An empty style sheet
    pub fn empty() -> Self {
        Self {
            styles: IndexMap::new(),
        }
    }

    /// Declare or replace the style for a role
    pub fn set(&mut self, role: StyleRole, style: StyleDefinition) -> &mut Self {
        self.styles.insert(role, style);
        self
    }

    pub fn get(&self, role: StyleRole) -> Option<&StyleDefinition> {
        self.styles.get(&role)
    }

    /// Look up a style by its declared name
    pub fn by_id(&self, style_id: &str) -> Option<&StyleDefinition> {
        self.styles
            .iter()
            .find(|(role, _)| role.style_id() == style_id)
            .map(|(_, style)| style)
    }

    pub fn iter(&self) -> impl Iterator<Item = (StyleRole, &StyleDefinition)> {
        self.styles.iter().map(|(role, style)| (*role, style))
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

const BRAND_NAVY: &str = "#041E42";

impl Default for StyleSheet {
    fn default() -> Self {
        let mut sheet = Self::empty();

        sheet.set(
            StyleRole::Document,
            StyleDefinition {
                run: RunStyle {
                    font: Some("Arial".to_string()),
                    size: Some(20),
                    ..Default::default()
                },
                paragraph: ParagraphStyle {
                    spacing: Spacing {
                        line: Some(276),
                        after: Some(240),
                        ..Default::default()
                    },
                    ..Default::default()
                },
                based_on: None,
            },
        );

        sheet.set(
            StyleRole::Title,
            StyleDefinition {
                run: RunStyle {
                    size: Some(72),
                    bold: Some(true),
                    colour: Colour::parse(BRAND_NAVY),
                    ..Default::default()
                },
                paragraph: ParagraphStyle {
                    spacing: Spacing {
                        before: Some(3600),
                        line: Some(276),
                        after: Some(120),
                    },
                    ..Default::default()
                },
                based_on: None,
            },
        );

        sheet.set(
            StyleRole::Heading(HeadingLevel::H1),
            StyleDefinition {
                run: RunStyle {
                    size: Some(40),
                    bold: Some(true),
                    colour: Colour::parse(BRAND_NAVY),
                    ..Default::default()
                },
                paragraph: ParagraphStyle {
                    spacing: Spacing {
                        line: Some(276),
                        after: Some(120),
                        ..Default::default()
                    },
                    thematic_break: true,
                    ..Default::default()
                },
                based_on: Some(StyleRole::Document.style_id().to_string()),
            },
        );

        for level in [
            HeadingLevel::H2,
            HeadingLevel::H3,
            HeadingLevel::H4,
            HeadingLevel::H5,
        ] {
            sheet.set(
                StyleRole::Heading(level),
                StyleDefinition {
                    run: RunStyle {
                        bold: Some(true),
                        ..Default::default()
                    },
                    based_on: Some(StyleRole::Document.style_id().to_string()),
                    ..Default::default()
                },
            );
        }

        sheet.set(
            StyleRole::ListParagraph,
            StyleDefinition {
                paragraph: ParagraphStyle {
                    contextual_spacing: true,
                    ..Default::default()
                },
                ..Default::default()
            },
        );

        sheet
    }
}
