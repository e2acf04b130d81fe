//! HTML tokenizing support.
//!
//! Streams an HTML string through lol_html and records the start tags, end
//! tags and text chunks it sees as a flat [`Token`] sequence. No DOM is
//! built; nesting is recovered later by the tree builder. Text is captured at
//! document level so character data outside any element is kept, and
//! character references are decoded once chunks are joined.

use std::cell::RefCell;
use std::rc::Rc;

use lol_html::html_content::EndTag;
use lol_html::{doc_text, element, rewrite_str, EndTagHandler, RewriteStrSettings};

use html_escape::decode_html_entities;

use crate::token::{Attribute, Token};
use crate::Result;

/// Tokenize an HTML string.
///
/// Tag names are lowercased. Elements without a literal end tag in the
/// source produce no [`Token::EndTag`].
///
/// # Example
///
/// ```rust
/// use htmldocx::{tokenize, Token};
///
/// let tokens = tokenize("<p>Hi</p>").unwrap();
/// assert_eq!(tokens, vec![Token::start("p"), Token::chars("Hi"), Token::end("p")]);
/// ```
pub fn tokenize(html: &str) -> Result<Vec<Token>> {
    let tokens = Rc::new(RefCell::new(Vec::new()));

    let tokens_for_element = Rc::clone(&tokens);
    let tokens_for_text = Rc::clone(&tokens);

    rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![
                element!("*", |el| {
                    let name = el.tag_name().to_ascii_lowercase();
                    let attributes = el
                        .attributes()
                        .iter()
                        .map(|attr| Attribute::new(attr.name(), attr.value()))
                        .collect();

                    tokens_for_element.borrow_mut().push(Token::StartTag {
                        name: name.clone(),
                        attributes,
                        self_closing: el.is_self_closing(),
                    });

                    if let Some(handlers) = el.end_tag_handlers() {
                        let tokens_for_end = Rc::clone(&tokens_for_element);
                        let handler: EndTagHandler<'static> =
                            Box::new(move |_end: &mut EndTag<'_>| {
                                tokens_for_end.borrow_mut().push(Token::EndTag { name });
                                Ok(())
                            });
                        handlers.push(handler);
                    }

                    Ok(())
                }),
            ],
            document_content_handlers: vec![doc_text!(|chunk| {
                let content = chunk.as_str();
                if !content.is_empty() {
                    tokens_for_text
                        .borrow_mut()
                        .push(Token::Chars(content.to_string()));
                }
                Ok(())
            })],
            ..Default::default()
        },
    )?;

    let tokens = tokens.take();
    Ok(merge_text_chunks(tokens)
        .into_iter()
        .map(decode_chars)
        .collect())
}

/// Decode character references such as `&amp;` or `&#8217;` in text tokens
fn decode_chars(token: Token) -> Token {
    match token {
        Token::Chars(text) => Token::Chars(decode_html_entities(&text).into_owned()),
        other => other,
    }
}

/// Join text chunks the rewriter split inside a single text node.
///
/// Text on either side of a comment also ends up in one token.
fn merge_text_chunks(tokens: Vec<Token>) -> Vec<Token> {
    let mut merged: Vec<Token> = Vec::with_capacity(tokens.len());
    for token in tokens {
        if let (Some(Token::Chars(previous)), Token::Chars(next)) = (merged.last_mut(), &token) {
            previous.push_str(next);
            continue;
        }
        merged.push(token);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_paragraph() {
        let tokens = tokenize("<p>Hello World</p>").unwrap();
        assert_eq!(
            tokens,
            vec![Token::start("p"), Token::chars("Hello World"), Token::end("p")]
        );
    }

    #[test]
    fn test_nested_tags() {
        let tokens = tokenize("<p>Hello <b>World</b></p>").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::start("p"),
                Token::chars("Hello "),
                Token::start("b"),
                Token::chars("World"),
                Token::end("b"),
                Token::end("p"),
            ]
        );
    }

    #[test]
    fn test_attributes_and_void_elements() {
        let tokens = tokenize(r#"<img src="a.png" alt="A"><img src="b.png"/>"#).unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::start_with_attrs("img", vec![("src", "a.png"), ("alt", "A")]),
                Token::void("img", vec![("src", "b.png")]),
            ]
        );
    }

    #[test]
    fn test_tag_names_are_lowercased() {
        let tokens = tokenize("<DIV>x</DIV>").unwrap();
        assert_eq!(
            tokens,
            vec![Token::start("div"), Token::chars("x"), Token::end("div")]
        );
    }

    #[test]
    fn test_text_outside_elements_is_kept() {
        let tokens = tokenize("hello <b>x</b> tail").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::chars("hello "),
                Token::start("b"),
                Token::chars("x"),
                Token::end("b"),
                Token::chars(" tail"),
            ]
        );
    }

    #[test]
    fn test_character_references_are_decoded() {
        let tokens = tokenize("<p>Tom &amp; Jerry &lt;3&#8217;s</p>").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::start("p"),
                Token::chars("Tom & Jerry <3\u{2019}s"),
                Token::end("p"),
            ]
        );
    }

    #[test]
    fn test_decode_leaves_tags_alone() {
        assert_eq!(decode_chars(Token::chars("a&nbsp;b")), Token::chars("a\u{a0}b"));
        assert_eq!(decode_chars(Token::end("p")), Token::end("p"));
    }

    #[test]
    fn test_merge_text_chunks() {
        let merged = merge_text_chunks(vec![
            Token::chars("a"),
            Token::chars("b"),
            Token::start("b"),
            Token::chars("c"),
        ]);
        assert_eq!(
            merged,
            vec![Token::chars("ab"), Token::start("b"), Token::chars("c")]
        );
    }
}
