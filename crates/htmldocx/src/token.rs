//! Markup tokens consumed by the tree builder.

/// A single attribute of a start tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One atomic lexical unit of the markup stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    StartTag {
        name: String,
        attributes: Vec<Attribute>,
        self_closing: bool,
    },
    EndTag {
        name: String,
    },
    Chars(String),
}

impl Token {
    /// A start tag without attributes
    pub fn start(name: &str) -> Self {
        Token::StartTag {
            name: name.to_string(),
            attributes: Vec::new(),
            self_closing: false,
        }
    }

    pub fn start_with_attrs(name: &str, attrs: Vec<(&str, &str)>) -> Self {
        Token::StartTag {
            name: name.to_string(),
            attributes: attrs
                .into_iter()
                .map(|(k, v)| Attribute::new(k, v))
                .collect(),
            self_closing: false,
        }
    }

    /// A self-closing start tag such as `<img src="..."/>`
    pub fn void(name: &str, attrs: Vec<(&str, &str)>) -> Self {
        let mut token = Token::start_with_attrs(name, attrs);
        if let Token::StartTag { self_closing, .. } = &mut token {
            *self_closing = true;
        }
        token
    }

    pub fn end(name: &str) -> Self {
        Token::EndTag {
            name: name.to_string(),
        }
    }

    pub fn chars(text: &str) -> Self {
        Token::Chars(text.to_string())
    }
}

/// First value of the named attribute, matched case-insensitively
pub fn attr<'a>(attributes: &'a [Attribute], name: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|a| a.name.eq_ignore_ascii_case(name))
        .map(|a| a.value.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attr_takes_first_match() {
        let attrs = vec![
            Attribute::new("SRC", "first.png"),
            Attribute::new("src", "second.png"),
        ];
        assert_eq!(attr(&attrs, "src"), Some("first.png"));
        assert_eq!(attr(&attrs, "alt"), None);
    }

    #[test]
    fn test_void_token() {
        let token = Token::void("img", vec![("src", "a.png")]);
        assert_eq!(
            token,
            Token::StartTag {
                name: "img".to_string(),
                attributes: vec![Attribute::new("src", "a.png")],
                self_closing: true,
            }
        );
    }
}
