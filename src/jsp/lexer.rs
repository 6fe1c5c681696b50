//! Lexer module for JSP templates
//!
//! This module contains the tokenization logic for JSP sources, including token
//! definitions and the lexer implementation.
//!
//! The lexer only finds construct boundaries. Every JSP construct (`<% %>`, `<%= %>`,
//! `<%! %>`, `<%@ %>`, `<%-- --%>` and the two `fmt` bundle tags) becomes exactly one
//! token whose span covers the opening and closing delimiters. Everything else is
//! markup, lexed as runs of text plus lone `<` characters; the grammar engine glues
//! consecutive markup tokens back together.
//!
//! An opener without its terminator yields a [`LexError`] for the opener alone, and
//! lexing resumes right after it, so one broken construct never hides later problems.

pub mod lexer_impl;
pub mod tokens;

pub use lexer_impl::{tokenize, tokenize_with_spans, LexError};
pub use tokens::Token;
