//! Grammar engine for JSP templates
//!
//! The engine walks the token stream once, in source order, and reports what it finds to
//! two listeners:
//!
//! - a [`ConstructListener`], called exactly once per recognized construct;
//! - an [`ErrorListener`], called once per syntax problem.
//!
//! Recognition never stops at a problem. Unterminated constructs, malformed directive or
//! tag attributes and unknown directives are all reported, and the engine carries on with
//! whatever follows, so a single pass surfaces every problem in a template.
//!
//! Consecutive markup tokens are handed over as one markup construct. Directives only
//! produce callbacks for `page import`; every comma-separated entry of an import list is
//! its own import construct.

pub mod attributes;

use crate::jsp::lexer::{tokenize_with_spans, Token};
use crate::jsp::position::SourceLocation;
use attributes::{char_to_byte, describe_error, directive_body, tag_body, unquote, Attributes};
use chumsky::Parser;
use std::ops::Range;
use tracing::{debug, warn};

/// Scopes a `<fmt:message>` variable can be published in
const VARIABLE_SCOPES: [&str; 4] = ["page", "request", "session", "application"];

/// Receives one callback per recognized construct
pub trait ConstructListener {
    /// `<%-- ... --%>`, delimiters included
    fn comment(&mut self, raw: &str);
    /// `<%! ... %>`, delimiters included
    fn declaration(&mut self, raw: &str);
    /// One entry of a `page import` list, still quoted
    fn import(&mut self, quoted: &str);
    /// `<% ... %>`, delimiters included
    fn code(&mut self, raw: &str);
    /// `<fmt:message>`; carries at least `key` and `var`
    fn bundle_variable(&mut self, attributes: &Attributes);
    /// `<fmt:setBundle>`; carries at least `basename`
    fn bundle_set(&mut self, attributes: &Attributes);
    /// A maximal run of literal template text
    fn markup(&mut self, content: &str);
    /// `<%= ... %>`, delimiters included
    fn expression(&mut self, raw: &str);
}

/// Receives syntax problems and recognition signals
pub trait ErrorListener {
    /// A grammar violation at a 1-based line and 0-based column
    fn syntax_error(&mut self, line: usize, column: usize, message: &str);

    /// Input the engine accepted, but could have read another way
    fn report_ambiguity(&mut self, _line: usize, _column: usize, _reason: &str) {}

    /// Input whose meaning depends on a servlet context the generated class lacks
    fn report_context_sensitivity(&mut self, _line: usize, _column: usize, _reason: &str) {}
}

pub struct GrammarEngine<'src> {
    source: &'src str,
    location: SourceLocation,
}

impl<'src> GrammarEngine<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            location: SourceLocation::new(source),
        }
    }

    /// Run one recognition pass over the whole source
    pub fn recognize(
        &self,
        listener: &mut dyn ConstructListener,
        errors: &mut dyn ErrorListener,
    ) {
        let mut pending_markup: Option<Range<usize>> = None;

        for (token, span) in tokenize_with_spans(self.source) {
            match token {
                Ok(token) if token.is_markup() => {
                    if token == Token::Angle {
                        self.check_unsupported_tag(span.end, errors);
                    }
                    pending_markup = Some(match pending_markup {
                        Some(pending) => pending.start..span.end,
                        None => span,
                    });
                }
                Ok(token) => {
                    self.flush_markup(pending_markup.take(), listener);
                    self.construct(token, span, listener, errors);
                }
                Err(error) => {
                    self.flush_markup(pending_markup.take(), listener);
                    self.error_at(span.start, &error.to_string(), errors);
                }
            }
        }

        self.flush_markup(pending_markup.take(), listener);
    }

    fn construct(
        &self,
        token: Token,
        span: Range<usize>,
        listener: &mut dyn ConstructListener,
        errors: &mut dyn ErrorListener,
    ) {
        let raw = &self.source[span.clone()];

        match token {
            Token::Comment => listener.comment(raw),
            Token::Declaration => listener.declaration(raw),
            Token::Expression => listener.expression(raw),
            Token::Scriptlet => listener.code(raw),
            Token::Directive => self.directive(raw, span.start, listener, errors),
            Token::BundleMessage | Token::BundleSet => {
                self.bundle_tag(token, raw, span.start, listener, errors)
            }
            Token::Angle | Token::Markup => listener.markup(raw),
        }
    }

    fn directive(
        &self,
        raw: &str,
        start: usize,
        listener: &mut dyn ConstructListener,
        errors: &mut dyn ErrorListener,
    ) {
        let opener = Token::Directive.opener();
        let body = raw
            .strip_prefix(opener)
            .and_then(|rest| rest.strip_suffix("%>"))
            .unwrap_or_default();
        let body_start = start + opener.len();

        let directive = match directive_body().parse(body) {
            Ok(directive) => directive,
            Err(parse_errors) => {
                for error in parse_errors {
                    let offset = body_start + char_to_byte(body, error.span().start);
                    self.error_at(offset, &describe_error(&error, "directive"), errors);
                }
                return;
            }
        };

        match directive.name.as_str() {
            "page" => {
                for attribute in directive.attributes.iter() {
                    if attribute.name == "import" {
                        for import in split_imports(&attribute.value) {
                            listener.import(&import);
                        }
                    } else {
                        let position = self.location.byte_to_position(start);
                        errors.report_context_sensitivity(
                            position.line,
                            position.column,
                            &format!("page attribute '{}' is dropped", attribute.name),
                        );
                    }
                }
            }
            "taglib" => debug!(attributes = ?directive.attributes, "taglib directive skipped"),
            "include" => warn!(
                attributes = ?directive.attributes,
                "include directive skipped, included content is not converted"
            ),
            other => self.error_at(start, &format!("unknown directive '{}'", other), errors),
        }
    }

    fn bundle_tag(
        &self,
        token: Token,
        raw: &str,
        start: usize,
        listener: &mut dyn ConstructListener,
        errors: &mut dyn ErrorListener,
    ) {
        let opener = token.opener();
        let body = raw
            .strip_prefix(opener)
            .and_then(|rest| rest.strip_suffix('>'))
            .unwrap_or_default();
        let body_start = start + opener.len();

        let attributes = match tag_body().parse(body) {
            Ok(attributes) => attributes,
            Err(parse_errors) => {
                for error in parse_errors {
                    let offset = body_start + char_to_byte(body, error.span().start);
                    let context = format!("{}> attributes", opener);
                    self.error_at(offset, &describe_error(&error, &context), errors);
                }
                return;
            }
        };

        let required: &[&str] = match token {
            Token::BundleMessage => &["key", "var"],
            _ => &["basename"],
        };
        let missing: Vec<&str> = required
            .iter()
            .copied()
            .filter(|name| attributes.get(name).is_none())
            .collect();
        for name in &missing {
            let message = format!("missing required attribute '{}' on {}>", name, opener);
            self.error_at(start, &message, errors);
        }
        if !missing.is_empty() {
            return;
        }

        if let Some(scope) = attributes.get("scope") {
            if !VARIABLE_SCOPES.contains(&unquote(scope)) {
                let message = format!("invalid scope {} on {}>", scope, opener);
                self.error_at(start, &message, errors);
                return;
            }
        }

        match token {
            Token::BundleMessage => listener.bundle_variable(&attributes),
            _ => listener.bundle_set(&attributes),
        }
    }

    /// A `<fmt:` tag the lexer does not know falls through to markup
    fn check_unsupported_tag(&self, after_angle: usize, errors: &mut dyn ErrorListener) {
        if self.source[after_angle..].starts_with("fmt:") {
            let position = self.location.byte_to_position(after_angle - 1);
            errors.report_ambiguity(
                position.line,
                position.column,
                "unsupported fmt tag passed through as markup",
            );
        }
    }

    fn flush_markup(&self, pending: Option<Range<usize>>, listener: &mut dyn ConstructListener) {
        if let Some(range) = pending {
            listener.markup(&self.source[range]);
        }
    }

    fn error_at(&self, offset: usize, message: &str, errors: &mut dyn ErrorListener) {
        let position = self.location.byte_to_position(offset);
        errors.syntax_error(position.line, position.column, message);
    }
}

/// Split a quoted import list into individually quoted entries
fn split_imports(quoted: &str) -> Vec<String> {
    let quote = quoted.chars().next().unwrap_or('"');
    unquote(quoted)
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| format!("{}{}{}", quote, entry, quote))
        .collect()
}
