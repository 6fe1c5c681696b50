//! Semantic actions
//!
//! [`SemanticActions`] is the [`ConstructListener`] that turns grammar callbacks into IR
//! nodes on a borrowed [`Document`]. Every handler sees only the raw payload of its own
//! callback, strips that construct's delimiters, and appends exactly one node (a bundle
//! set also registers its import).

use crate::jsp::grammar::attributes::{unquote, Attributes};
use crate::jsp::grammar::ConstructListener;
use crate::jsp::ir::rewrite::{self, Scope, Stage};
use crate::jsp::ir::{
    BundleSet, BundleVariable, Comment, Declaration, Document, ExpressionCode, Import,
    MarkupCode, ScriptletCode,
};
use tracing::debug;

/// Scope a bundle variable gets when the tag names none
const DEFAULT_SCOPE: &str = "page";

pub struct SemanticActions<'doc> {
    document: &'doc mut Document,
    /// Set by the first scriptlet, expression or non-blank markup
    code_started: bool,
}

impl<'doc> SemanticActions<'doc> {
    pub fn new(document: &'doc mut Document) -> Self {
        Self {
            document,
            code_started: false,
        }
    }
}

/// Remove one leading `open` and one trailing `close`, where present
fn strip_delimiters<'a>(raw: &'a str, open: &str, close: &str) -> &'a str {
    let inner = raw.strip_prefix(open).unwrap_or(raw);
    inner.strip_suffix(close).unwrap_or(inner)
}

fn unquoted_attribute(attributes: &Attributes, name: &str) -> Option<String> {
    attributes.get(name).map(|value| unquote(value).to_string())
}

impl ConstructListener for SemanticActions<'_> {
    fn comment(&mut self, raw: &str) {
        debug!(raw, "adding comment");
        let comment = Comment::wrap(strip_delimiters(raw, "<%--", "--%>").trim());
        if self.code_started {
            self.document.add_code(comment);
        } else {
            self.document.add_comment(comment);
        }
    }

    fn declaration(&mut self, raw: &str) {
        debug!(raw, "adding declaration");
        let code = strip_delimiters(raw, "<%!", "%>").trim();
        self.document.add_declaration(Declaration::new(code));
    }

    fn import(&mut self, quoted: &str) {
        debug!(quoted, "adding import");
        self.document.add_import(Import::new(unquote(quoted)));
    }

    fn code(&mut self, raw: &str) {
        debug!(raw, "adding code");
        let code = strip_delimiters(raw, "<%", "%>");
        let code = rewrite::apply(Stage::Intake, Scope::Scriptlet, code);
        self.code_started = true;
        self.document.add_code(ScriptletCode::new(code));
    }

    fn bundle_variable(&mut self, attributes: &Attributes) {
        debug!(?attributes, "adding bundle variable");
        let key = unquoted_attribute(attributes, "key").unwrap_or_default();
        let var = unquoted_attribute(attributes, "var").unwrap_or_default();
        let scope =
            unquoted_attribute(attributes, "scope").unwrap_or_else(|| DEFAULT_SCOPE.to_string());
        self.document
            .add_bundle_variable(BundleVariable::new(key, var, scope));
    }

    fn bundle_set(&mut self, attributes: &Attributes) {
        debug!(?attributes, "adding bundle set");
        let basename = unquoted_attribute(attributes, "basename").unwrap_or_default();
        self.document.add_bundle_set(BundleSet::new(basename));
    }

    fn markup(&mut self, content: &str) {
        debug!(content, "adding markup");
        if !content.trim().is_empty() {
            self.code_started = true;
        }
        self.document.add_markup(MarkupCode::new(content));
    }

    fn expression(&mut self, raw: &str) {
        debug!(raw, "adding expression");
        let expression = strip_delimiters(raw, "<%=", "%>");
        self.code_started = true;
        self.document.add_code(ExpressionCode::new(expression));
    }
}
