//! Attribute list parsing for directives and bundle tags
//!
//! Directives (`<%@ page import="a.B" %>`) and the `fmt` tags carry `name="value"`
//! pairs. The combinators here parse the text between the opener and the closing
//! delimiter. Values keep their quotes: unwrapping them is the semantic adapter's job.

use chumsky::prelude::*;
use serde::Serialize;

/// Type alias for parser error
type ParserError = Simple<char>;

/// One `name="value"` pair; `value` still carries its quotes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// Attributes of one directive or tag, in source order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Attributes(Vec<Attribute>);

impl Attributes {
    pub fn new(attributes: Vec<Attribute>) -> Self {
        Self(attributes)
    }

    /// Quoted value of the first attribute called `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|attribute| attribute.name == name)
            .map(|attribute| attribute.value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.0.iter()
    }
}

/// A directive body: its name followed by attributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveBody {
    pub name: String,
    pub attributes: Attributes,
}

fn attribute_name() -> impl Parser<char, String, Error = ParserError> + Clone {
    filter(|c: &char| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ':' | '.'))
        .repeated()
        .at_least(1)
        .collect::<String>()
        .labelled("attribute name")
}

fn quoted_value() -> impl Parser<char, String, Error = ParserError> + Clone {
    let double = just('"')
        .chain(filter(|c: &char| *c != '"').repeated())
        .chain(just('"'));
    let single = just('\'')
        .chain(filter(|c: &char| *c != '\'').repeated())
        .chain(just('\''));

    double
        .or(single)
        .collect::<String>()
        .labelled("quoted value")
}

fn attribute() -> impl Parser<char, Attribute, Error = ParserError> + Clone {
    attribute_name()
        .then_ignore(just('=').padded())
        .then(quoted_value())
        .map(|(name, value)| Attribute { name, value })
}

fn attribute_list() -> impl Parser<char, Attributes, Error = ParserError> + Clone {
    attribute().padded().repeated().map(Attributes::new)
}

/// Parser for the text between `<%@` and `%>`
pub fn directive_body() -> impl Parser<char, DirectiveBody, Error = ParserError> {
    text::ident::<char, ParserError>()
        .padded()
        .then(attribute_list())
        .then_ignore(end())
        .map(|(name, attributes)| DirectiveBody { name, attributes })
}

/// Parser for the text between a tag name and its closing `>`
pub fn tag_body() -> impl Parser<char, Attributes, Error = ParserError> {
    attribute_list()
        .then_ignore(just('/').padded().or_not())
        .then_ignore(end())
}

/// Render a chumsky error as a one-line message about `context`
pub fn describe_error(error: &ParserError, context: &str) -> String {
    match error.found() {
        Some(found) => format!("unexpected '{}' in {}", found.escape_default(), context),
        None => format!("unexpected end of {}", context),
    }
}

/// Drop exactly one leading and one trailing character (the quotes of a value)
pub fn unquote(quoted: &str) -> &str {
    let mut chars = quoted.chars();
    chars.next();
    chars.next_back();
    chars.as_str()
}

/// Byte offset of the `char_index`-th character of `text`
pub fn char_to_byte(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}
