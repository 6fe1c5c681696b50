//! Token definitions for JSP templates
//!
//! This module defines all the tokens that can be produced by the JSP lexer.
//! The tokens are defined using the logos derive macro for efficient tokenization.
//! Construct tokens use callbacks to consume everything up to their terminator, so a
//! single token always spans a complete construct.
use logos::{Lexer, Logos};
use serde::Serialize;
use std::fmt;

/// All possible tokens in a JSP template
#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy, Serialize)]
pub enum Token {
    // Hidden comments: <%-- ... --%>
    #[token("<%--", close_comment)]
    Comment,

    // Member declarations: <%! ... %>
    #[token("<%!", close_scriptlet)]
    Declaration,

    // Directives: <%@ page ... %>
    #[token("<%@", close_scriptlet)]
    Directive,

    // Expressions: <%= ... %>
    #[token("<%=", close_scriptlet)]
    Expression,

    // Scriptlets: <% ... %>
    #[token("<%", close_scriptlet)]
    Scriptlet,

    // Resource bundle lookups: <fmt:message key=".." var=".." scope=".."/>
    #[token("<fmt:message", close_tag)]
    BundleMessage,

    // Resource bundle declarations: <fmt:setBundle basename=".."/>
    #[token("<fmt:setBundle", close_tag)]
    BundleSet,

    // A `<` that does not open any construct (plain markup tags)
    #[token("<")]
    Angle,

    // Text content (catch-all for everything that is not a `<`)
    #[regex(r"[^<]+")]
    Markup,
}

fn close_comment(lex: &mut Lexer<Token>) -> bool {
    bump_past(lex, "--%>")
}

fn close_scriptlet(lex: &mut Lexer<Token>) -> bool {
    bump_past(lex, "%>")
}

/// Consume the remainder up to and including `terminator`
fn bump_past(lex: &mut Lexer<Token>, terminator: &str) -> bool {
    match lex.remainder().find(terminator) {
        Some(index) => {
            lex.bump(index + terminator.len());
            true
        }
        None => false,
    }
}

/// Consume a tag up to its first `>` outside of quoted attribute values
fn close_tag(lex: &mut Lexer<Token>) -> bool {
    let mut quote: Option<char> = None;

    for (index, ch) in lex.remainder().char_indices() {
        match quote {
            Some(open) if ch == open => quote = None,
            Some(_) => {}
            None => match ch {
                '"' | '\'' => quote = Some(ch),
                '>' => {
                    lex.bump(index + 1);
                    return true;
                }
                _ => {}
            },
        }
    }

    false
}

impl Token {
    /// Check if this token is part of literal markup
    pub fn is_markup(&self) -> bool {
        matches!(self, Token::Markup | Token::Angle)
    }

    /// Check if this token is one of the `fmt` bundle tags
    pub fn is_bundle_tag(&self) -> bool {
        matches!(self, Token::BundleMessage | Token::BundleSet)
    }

    /// The literal that opens this token
    pub fn opener(&self) -> &'static str {
        match self {
            Token::Comment => "<%--",
            Token::Declaration => "<%!",
            Token::Directive => "<%@",
            Token::Expression => "<%=",
            Token::Scriptlet => "<%",
            Token::BundleMessage => "<fmt:message",
            Token::BundleSet => "<fmt:setBundle",
            Token::Angle => "<",
            Token::Markup => "",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Token::Comment => "comment",
            Token::Declaration => "declaration",
            Token::Directive => "directive",
            Token::Expression => "expression",
            Token::Scriptlet => "scriptlet",
            Token::BundleMessage => "bundle-message",
            Token::BundleSet => "bundle-set",
            Token::Angle => "angle",
            Token::Markup => "markup",
        };
        write!(f, "<{}>", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scriptlet_spans_whole_construct() {
        let mut lexer = Token::lexer("<% int a = 1; %>");
        assert_eq!(lexer.next(), Some(Ok(Token::Scriptlet)));
        assert_eq!(lexer.span(), 0..16);
        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn test_construct_openers() {
        let mut lexer = Token::lexer("<%-- c --%><%! int y; %><%@ page %><%= x %>");
        assert_eq!(lexer.next(), Some(Ok(Token::Comment)));
        assert_eq!(lexer.next(), Some(Ok(Token::Declaration)));
        assert_eq!(lexer.next(), Some(Ok(Token::Directive)));
        assert_eq!(lexer.next(), Some(Ok(Token::Expression)));
        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn test_comment_ignores_inner_scriptlet_terminator() {
        let mut lexer = Token::lexer("<%-- a %> b --%>after");
        assert_eq!(lexer.next(), Some(Ok(Token::Comment)));
        assert_eq!(lexer.slice(), "<%-- a %> b --%>");
        assert_eq!(lexer.next(), Some(Ok(Token::Markup)));
        assert_eq!(lexer.slice(), "after");
    }

    #[test]
    fn test_bundle_tags() {
        let mut lexer =
            Token::lexer("<fmt:setBundle basename=\"msgs\"/><fmt:message key=\"k\" var=\"v\"/>");
        assert_eq!(lexer.next(), Some(Ok(Token::BundleSet)));
        assert_eq!(lexer.slice(), "<fmt:setBundle basename=\"msgs\"/>");
        assert_eq!(lexer.next(), Some(Ok(Token::BundleMessage)));
        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn test_tag_terminator_inside_quotes() {
        let mut lexer = Token::lexer("<fmt:message key=\"a>b\" var='c>d'/>tail");
        assert_eq!(lexer.next(), Some(Ok(Token::BundleMessage)));
        assert_eq!(lexer.slice(), "<fmt:message key=\"a>b\" var='c>d'/>");
        assert_eq!(lexer.next(), Some(Ok(Token::Markup)));
    }

    #[test]
    fn test_plain_markup() {
        let mut lexer = Token::lexer("<p>Hello</p>");
        assert_eq!(lexer.next(), Some(Ok(Token::Angle)));
        assert_eq!(lexer.next(), Some(Ok(Token::Markup)));
        assert_eq!(lexer.slice(), "p>Hello");
        assert_eq!(lexer.next(), Some(Ok(Token::Angle)));
        assert_eq!(lexer.next(), Some(Ok(Token::Markup)));
        assert_eq!(lexer.slice(), "/p>");
        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn test_unterminated_scriptlet_is_an_error() {
        let mut lexer = Token::lexer("<% oops");
        assert_eq!(lexer.next(), Some(Err(())));
        assert_eq!(lexer.span(), 0..2);
        assert_eq!(lexer.next(), Some(Ok(Token::Markup)));
        assert_eq!(lexer.slice(), " oops");
    }

    #[test]
    fn test_token_predicates() {
        assert!(Token::Markup.is_markup());
        assert!(Token::Angle.is_markup());
        assert!(!Token::Scriptlet.is_markup());

        assert!(Token::BundleSet.is_bundle_tag());
        assert!(!Token::Directive.is_bundle_tag());
    }

    #[test]
    fn test_display() {
        assert_eq!(Token::Scriptlet.to_string(), "<scriptlet>");
        assert_eq!(Token::BundleMessage.to_string(), "<bundle-message>");
    }
}
