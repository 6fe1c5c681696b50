//! IR nodes
//!
//! [`Node`] is the closed set of constructs the converter knows about. Each variant wraps
//! a small struct holding the text captured from the template, and every one of them can
//! render itself through [`Render`]: append the generated Java, followed by a newline, to
//! a growing buffer.
//!
//! Nodes store text as captured (after intake rewrites only). Render-time rewrites are
//! applied while writing, so a node renders identically no matter how often it is asked.

use super::escape::escape_java_string;
use super::rewrite::{self, Scope, Stage};
use serde::Serialize;

/// Import every bundle-set tag registers
pub const RESOURCE_BUNDLE_IMPORT: &str = "java.util.ResourceBundle";

/// Local variable the bundle-set tag declares and bundle lookups read from
pub const BUNDLE_VARIABLE: &str = "bundle";

/// Capability shared by all nodes
pub trait Render {
    /// Append the rendered text, followed by a newline, to `out`
    fn render(&self, out: &mut String);
}

/// Any construct that can appear in a generated class
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Comment(Comment),
    Import(Import),
    Declaration(Declaration),
    Scriptlet(ScriptletCode),
    Markup(MarkupCode),
    Expression(ExpressionCode),
    BundleVariable(BundleVariable),
    BundleSet(BundleSet),
}

impl Render for Node {
    fn render(&self, out: &mut String) {
        match self {
            Node::Comment(n) => n.render(out),
            Node::Import(n) => n.render(out),
            Node::Declaration(n) => n.render(out),
            Node::Scriptlet(n) => n.render(out),
            Node::Markup(n) => n.render(out),
            Node::Expression(n) => n.render(out),
            Node::BundleVariable(n) => n.render(out),
            Node::BundleSet(n) => n.render(out),
        }
    }
}

/// A block comment, kept verbatim (delimiters included)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub text: String,
}

impl Comment {
    /// Wrap bare comment text into a Java block comment
    pub fn wrap(text: &str) -> Self {
        Self {
            text: format!("/*\n{}\n*/", text),
        }
    }
}

impl Render for Comment {
    fn render(&self, out: &mut String) {
        out.push_str(&self.text);
        out.push('\n');
    }
}

/// A single import; never deduplicated
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Import {
    pub name: String,
}

impl Import {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Render for Import {
    fn render(&self, out: &mut String) {
        out.push_str("import ");
        out.push_str(&self.name);
        out.push_str(";\n");
    }
}

/// A class member declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
    pub code: String,
}

impl Declaration {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

impl Render for Declaration {
    fn render(&self, out: &mut String) {
        out.push_str(&rewrite::apply(Stage::Render, Scope::Declaration, &self.code));
        out.push('\n');
    }
}

/// Statements from a scriptlet block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptletCode {
    pub code: String,
}

impl ScriptletCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

impl Render for ScriptletCode {
    fn render(&self, out: &mut String) {
        out.push_str(&rewrite::apply(Stage::Render, Scope::Scriptlet, &self.code));
        out.push('\n');
    }
}

/// Static template content written to the output buffer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkupCode {
    pub content: String,
}

impl MarkupCode {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// Coalesce a following markup fragment into this one
    pub fn append(&mut self, content: &str) {
        self.content.push_str(content);
    }
}

impl Render for MarkupCode {
    fn render(&self, out: &mut String) {
        out.push_str("\t\tout.print(\"");
        out.push_str(&escape_java_string(&self.content));
        out.push_str("\");\n");
    }
}

/// An expression whose value is written to the output buffer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpressionCode {
    pub expression: String,
}

impl ExpressionCode {
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
        }
    }
}

impl Render for ExpressionCode {
    fn render(&self, out: &mut String) {
        out.push_str("\t\tout.print(");
        out.push_str(self.expression.trim());
        out.push_str(");\n");
    }
}

/// Binds the bundle entry `key` to the local `var`, published in `scope`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BundleVariable {
    pub key: String,
    pub var: String,
    pub scope: String,
}

impl BundleVariable {
    pub fn new(key: impl Into<String>, var: impl Into<String>, scope: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            var: var.into(),
            scope: scope.into(),
        }
    }

    /// Receiver of `setAttribute` for the scope, `None` for page scope
    fn scope_holder(&self) -> Option<&'static str> {
        match self.scope.as_str() {
            "request" => Some("request"),
            "session" => Some("session"),
            "application" => Some("request.getServletContext()"),
            _ => None,
        }
    }
}

impl Render for BundleVariable {
    fn render(&self, out: &mut String) {
        out.push_str(&format!(
            "\t\tString {} = {}.getString(\"{}\");\n",
            self.var,
            BUNDLE_VARIABLE,
            escape_java_string(&self.key)
        ));
        if let Some(holder) = self.scope_holder() {
            out.push_str(&format!(
                "\t\t{}.setAttribute(\"{}\", {});\n",
                holder, self.var, self.var
            ));
        }
    }
}

/// Loads the resource bundle named `basename`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BundleSet {
    pub basename: String,
    /// False once an earlier bundle set has declared the variable
    pub declares_variable: bool,
}

impl BundleSet {
    pub fn new(basename: impl Into<String>) -> Self {
        Self {
            basename: basename.into(),
            declares_variable: true,
        }
    }

    /// The same bundle, assigned to the already declared variable
    pub fn reassigned(self) -> Self {
        Self {
            declares_variable: false,
            ..self
        }
    }

    /// The import this node needs in the generated class
    pub fn required_import(&self) -> Import {
        Import::new(RESOURCE_BUNDLE_IMPORT)
    }
}

impl Render for BundleSet {
    fn render(&self, out: &mut String) {
        let declaration = if self.declares_variable {
            "ResourceBundle "
        } else {
            ""
        };
        out.push_str(&format!(
            "\t\t{}{} = ResourceBundle.getBundle(\"{}\");\n",
            declaration,
            BUNDLE_VARIABLE,
            escape_java_string(&self.basename)
        ));
    }
}

macro_rules! impl_into_node {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Node {
                fn from(node: $ty) -> Self {
                    Node::$variant(node)
                }
            }
        )*
    };
}

impl_into_node!(
    Comment => Comment,
    Import => Import,
    Declaration => Declaration,
    ScriptletCode => Scriptlet,
    MarkupCode => Markup,
    ExpressionCode => Expression,
    BundleVariable => BundleVariable,
    BundleSet => BundleSet,
);
