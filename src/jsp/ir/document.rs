//! The aggregate document
//!
//! A [`Document`] owns every node produced for one template and knows how to assemble
//! them into the final class. Nodes live in five ordered sequences:
//!
//! - header comments, written before the class annotations
//! - imports, in encounter order and never deduplicated
//! - codes: scriptlets, markup, expressions and inline comments sharing one sequence so
//!   the original template order survives exactly
//! - declarations, written as class members after the request method
//! - scope setup: bundle nodes, written at the top of the request method
//!
//! Rendering is a pure function of that state, which is also why two documents are
//! equal exactly when their rendered text is equal.

use super::node::{
    BundleSet, BundleVariable, Comment, Declaration, Import, MarkupCode, Node, Render,
};
use super::rewrite::{self, Scope, Stage};
use serde::Serialize;
use std::hash::{Hash, Hasher};

const GENERATED_HEADER: &str = "/*\n \
* This class was automatically generated when transforming PPI to a JEE app\n \
* on November 2013.\n \
* \n \
* The code of the generator can be found at:\n \
* https://github.com/ivanator/jsp-parser\n \
* \n \
* Class derived from this source JSP:\n \
* ";

const STANDARD_IMPORTS: &str = "import java.io.StringWriter;\n\
import java.io.PrintWriter;\n\
import java.io.Writer;\n\
import javax.ejb.Stateless;\n\
import javax.servlet.http.HttpServletRequest;\n\
import javax.servlet.http.HttpServletResponse;\n\
import javax.servlet.http.HttpSession;\n\
import javax.servlet.jsp.PageContext;\n\
import javax.ws.rs.GET;\n\
import javax.ws.rs.POST;\n\
import javax.ws.rs.Path;\n\
import javax.ws.rs.Produces;\n\
import javax.ws.rs.core.Context;\n";

const METHOD_PROLOGUE: &str = "\t@GET @POST\n\
\t@Produces(\"application/json; charset=UTF-8\")\n\
\tpublic String doRun(\n\
\t\t\t@Context HttpServletRequest request,\n\
\t\t\t@Context HttpServletResponse response) throws Exception {\n\
\t\tHttpSession session = request.getSession(false);\n\
\t\tWriter stringOut = new StringWriter();\n\
\t\tPrintWriter out = new PrintWriter(stringOut);\n";

const METHOD_EPILOGUE: &str = "\t\treturn stringOut.toString();\n\t}\n";

/// Root of the IR: one generated class
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    package: String,
    class_name: String,
    route_path: String,
    source_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    component_name: Option<String>,
    comments: Vec<Node>,
    imports: Vec<Node>,
    codes: Vec<Node>,
    declarations: Vec<Node>,
    scope_setup: Vec<Node>,
}

impl Document {
    /// Create an empty document. The route path gains a leading `/` if it lacks one.
    pub fn new(
        package: impl Into<String>,
        class_name: impl Into<String>,
        route_path: &str,
        source_path: impl Into<String>,
    ) -> Self {
        let route_path = if route_path.starts_with('/') {
            route_path.to_string()
        } else {
            format!("/{}", route_path)
        };

        Self {
            package: package.into(),
            class_name: class_name.into(),
            route_path,
            source_path: source_path.into(),
            source_text: None,
            component_name: None,
            comments: Vec::new(),
            imports: Vec::new(),
            codes: Vec::new(),
            declarations: Vec::new(),
            scope_setup: Vec::new(),
        }
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn set_class_name(&mut self, class_name: impl Into<String>) {
        self.class_name = class_name.into();
    }

    pub fn route_path(&self) -> &str {
        &self.route_path
    }

    pub fn source_path(&self) -> &str {
        &self.source_path
    }

    pub fn component_name(&self) -> Option<&str> {
        self.component_name.as_deref()
    }

    pub fn set_component_name(&mut self, component_name: impl Into<String>) {
        self.component_name = Some(component_name.into());
    }

    /// Attach the raw template, echoed in a trailing comment
    pub fn set_source_text(&mut self, source_text: impl Into<String>) {
        self.source_text = Some(source_text.into());
    }

    pub fn add_comment(&mut self, comment: Comment) {
        self.comments.push(comment.into());
    }

    pub fn add_import(&mut self, import: Import) {
        self.imports.push(import.into());
    }

    pub fn add_declaration(&mut self, declaration: Declaration) {
        self.declarations.push(declaration.into());
    }

    /// Append a scriptlet, expression or inline comment to the code sequence
    pub fn add_code(&mut self, code: impl Into<Node>) {
        self.codes.push(code.into());
    }

    /// Append markup to the code sequence, merging it into a directly preceding markup node
    pub fn add_markup(&mut self, markup: MarkupCode) {
        match self.codes.last_mut() {
            Some(Node::Markup(previous)) => previous.append(&markup.content),
            _ => self.codes.push(markup.into()),
        }
    }

    pub fn add_bundle_variable(&mut self, variable: BundleVariable) {
        self.scope_setup.push(variable.into());
    }

    /// Register a bundle and the import it needs; only the first bundle declares the variable
    pub fn add_bundle_set(&mut self, bundle: BundleSet) {
        self.add_import(bundle.required_import());
        let declared = self
            .scope_setup
            .iter()
            .any(|node| matches!(node, Node::BundleSet(_)));
        let bundle = if declared { bundle.reassigned() } else { bundle };
        self.scope_setup.push(bundle.into());
    }

    pub fn comments(&self) -> &[Node] {
        &self.comments
    }

    pub fn imports(&self) -> &[Node] {
        &self.imports
    }

    pub fn codes(&self) -> &[Node] {
        &self.codes
    }

    pub fn declarations(&self) -> &[Node] {
        &self.declarations
    }

    pub fn scope_setup(&self) -> &[Node] {
        &self.scope_setup
    }

    /// Assemble the generated class
    pub fn to_code(&self) -> String {
        let mut code = String::new();
        self.write_metadata(&mut code);
        self.write_package(&mut code);
        code.push_str(STANDARD_IMPORTS);
        write_nodes(&mut code, &self.imports);
        write_nodes(&mut code, &self.comments);
        self.write_class_annotations(&mut code);
        self.write_class_body(&mut code);
        self.write_source_if_present(&mut code);
        code
    }

    fn write_metadata(&self, code: &mut String) {
        code.push_str(GENERATED_HEADER);
        code.push_str(&self.source_path);
        code.push_str("\n */\n");
    }

    fn write_package(&self, code: &mut String) {
        if !self.package.is_empty() {
            code.push_str("package ");
            code.push_str(&self.package);
            code.push_str(";\n");
        }
    }

    fn write_class_annotations(&self, code: &mut String) {
        code.push_str("@Stateless");
        if let Some(name) = &self.component_name {
            code.push_str("(name=\"");
            code.push_str(name);
            code.push_str("\")");
        }
        code.push('\n');

        code.push_str("@Path(\"");
        code.push_str(&self.route_path);
        code.push_str("\")\n");
    }

    fn write_class_body(&self, code: &mut String) {
        code.push_str("public class ");
        code.push_str(&self.class_name);
        code.push_str(" {\n");

        code.push_str(METHOD_PROLOGUE);
        write_nodes(code, &self.scope_setup);
        write_nodes(code, &self.codes);
        code.push_str(METHOD_EPILOGUE);

        write_nodes(code, &self.declarations);
        code.push('}');
    }

    fn write_source_if_present(&self, code: &mut String) {
        if let Some(source) = &self.source_text {
            code.push_str("\n/*\nOriginal JSP code as follows\n");
            code.push_str("(block comments replaced by: \"START-COMMENT\" ");
            code.push_str("and \"END-COMMENT\"):\n");
            code.push_str("---- ---- ----\n");
            code.push_str(&rewrite::apply(Stage::Render, Scope::SourceEcho, source));
            code.push_str("\n---- ---- ----\n*/");
        }
    }
}

fn write_nodes(code: &mut String, nodes: &[Node]) {
    for node in nodes {
        node.render(code);
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.to_code() == other.to_code()
    }
}

impl Eq for Document {}

impl Hash for Document {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_code().hash(state);
    }
}
