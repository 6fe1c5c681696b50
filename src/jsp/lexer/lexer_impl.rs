//! Implementation of the JSP lexer
//!
//! This module provides convenience functions for tokenizing JSP text.
//! The actual tokenization is handled entirely by logos; this layer only names the
//! failures logos reports so they can be turned into readable syntax problems.

use crate::jsp::lexer::tokens::Token;
use logos::Logos;
use std::ops::Range;
use thiserror::Error;

/// Why a slice of the source could not be tokenized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unterminated comment, missing '--%>'")]
    UnterminatedComment,
    #[error("unterminated '{opener}' block, missing '%>'")]
    UnterminatedScriptlet { opener: &'static str },
    #[error("unterminated '{opener}' tag, missing '>'")]
    UnterminatedTag { opener: &'static str },
    #[error("unrecognized input")]
    Unrecognized,
}

impl LexError {
    /// Classify a failed slice by the opener it starts with
    fn classify(slice: &str) -> Self {
        const OPENERS: [Token; 7] = [
            Token::Comment,
            Token::BundleSet,
            Token::BundleMessage,
            Token::Declaration,
            Token::Directive,
            Token::Expression,
            Token::Scriptlet,
        ];

        match OPENERS.iter().find(|token| slice.starts_with(token.opener())) {
            Some(Token::Comment) => LexError::UnterminatedComment,
            Some(token) if token.is_bundle_tag() => LexError::UnterminatedTag {
                opener: token.opener(),
            },
            Some(token) => LexError::UnterminatedScriptlet {
                opener: token.opener(),
            },
            None => LexError::Unrecognized,
        }
    }
}

/// Convenience function to tokenize a string and collect all valid tokens
pub fn tokenize(source: &str) -> Vec<Token> {
    Token::lexer(source)
        .filter_map(|result| result.ok())
        .collect()
}

/// Tokenize a string keeping every token, failures included, with its byte span
pub fn tokenize_with_spans(source: &str) -> Vec<(Result<Token, LexError>, Range<usize>)> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let token = result.map_err(|()| LexError::classify(lexer.slice()));
        tokens.push((token, lexer.span()));
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_tokenization() {
        let tokens = tokenize("<p><%= name %></p>");
        assert_eq!(
            tokens,
            vec![
                Token::Angle,
                Token::Markup,
                Token::Expression,
                Token::Angle,
                Token::Markup
            ]
        );
    }

    #[test]
    fn test_tokenize_drops_failures() {
        let tokens = tokenize("<%= broken");
        assert_eq!(tokens, vec![Token::Markup]);
    }

    #[test]
    fn test_tokenize_with_spans() {
        let tokens = tokenize_with_spans("a<% b %>c");
        assert_eq!(
            tokens,
            vec![
                (Ok(Token::Markup), 0..1),
                (Ok(Token::Scriptlet), 1..8),
                (Ok(Token::Markup), 8..9),
            ]
        );
    }

    #[test]
    fn test_unterminated_constructs_are_classified() {
        let tokens = tokenize_with_spans("<%-- x");
        assert_eq!(tokens[0], (Err(LexError::UnterminatedComment), 0..4));

        let tokens = tokenize_with_spans("<%= x");
        assert_eq!(
            tokens[0],
            (Err(LexError::UnterminatedScriptlet { opener: "<%=" }), 0..3)
        );

        let tokens = tokenize_with_spans("<fmt:setBundle basename=\"x\"");
        assert_eq!(
            tokens[0],
            (Err(LexError::UnterminatedTag { opener: "<fmt:setBundle" }), 0..14)
        );
    }

    #[test]
    fn test_lexing_resumes_after_failure() {
        let tokens = tokenize_with_spans("<%-- a\n<%! int b; %>");
        assert!(tokens[0].0.is_err());
        assert!(tokens
            .iter()
            .any(|(token, _)| token == &Ok(Token::Declaration)));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            LexError::UnterminatedScriptlet { opener: "<%" }.to_string(),
            "unterminated '<%' block, missing '%>'"
        );
        assert_eq!(
            LexError::UnterminatedComment.to_string(),
            "unterminated comment, missing '--%>'"
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(tokenize(""), vec![]);
    }
}
