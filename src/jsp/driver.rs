//! Conversion driver
//!
//! [`Driver`] is the entry point of the crate. It owns the template input for the length of
//! one conversion, derives the generated class and component names from the route path,
//! and runs a single recognition pass that feeds [`SemanticActions`] while collecting every
//! syntax problem. Either all problems come back together in [`ConvertError::Parse`] or a
//! fully populated [`Document`] does; a partial document is never returned.
//!
//! ```text
//! let document = Driver::open("jsp/user_list.jsp", "com.acme", "users/user_list.jsp")?
//!     .run()?;
//! assert_eq!(document.class_name(), "UserList");
//! ```

use crate::jsp::adapter::SemanticActions;
use crate::jsp::error::{ConvertError, SyntaxProblem};
use crate::jsp::grammar::{ErrorListener, GrammarEngine};
use crate::jsp::ir::Document;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Separator between the words of a page name
const CLASS_NAME_SEPARATOR: char = '_';

/// Switches for the optional parts of the generated class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverOptions {
    /// Echo the raw template in a trailing comment
    pub embed_source: bool,
    /// Name the stateless component `{package}-{ClassName}`
    pub named_component: bool,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            embed_source: true,
            named_component: false,
        }
    }
}

pub struct Driver<R: Read> {
    input: R,
    source_path: String,
    package: String,
    route_path: String,
    class_name: String,
    component_name: String,
    options: DriverOptions,
}

impl Driver<File> {
    /// Open a file-backed driver; the file path doubles as the source path
    pub fn open(
        path: impl AsRef<Path>,
        package: impl Into<String>,
        route_path: &str,
    ) -> Result<Self, ConvertError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ConvertError::from_io(path, source))?;
        Driver::new(file, path.display().to_string(), package, route_path)
    }
}

impl<R: Read> Driver<R> {
    pub fn new(
        input: R,
        source_path: impl Into<String>,
        package: impl Into<String>,
        route_path: &str,
    ) -> Result<Self, ConvertError> {
        let package = package.into();
        let class_name = derive_class_name(route_path);
        if class_name.is_empty() {
            return Err(ConvertError::InvalidRoute(route_path.to_string()));
        }
        let component_name = format!("{}-{}", package, class_name);

        Ok(Self {
            input,
            source_path: source_path.into(),
            package,
            route_path: normalize_route(route_path),
            class_name,
            component_name,
            options: DriverOptions::default(),
        })
    }

    pub fn with_options(mut self, options: DriverOptions) -> Self {
        self.options = options;
        self
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn component_name(&self) -> &str {
        &self.component_name
    }

    pub fn route_path(&self) -> &str {
        &self.route_path
    }

    /// Read the whole template, recognize it and build the document
    pub fn run(self) -> Result<Document, ConvertError> {
        let Driver {
            mut input,
            source_path,
            package,
            route_path,
            class_name,
            component_name,
            options,
        } = self;

        let mut source = String::new();
        input
            .read_to_string(&mut source)
            .map_err(|err| ConvertError::from_io(&source_path, err))?;
        drop(input);

        info!(path = %source_path, class = %class_name, "converting template");

        let mut document = Document::new(package, class_name, &route_path, source_path.clone());
        let mut diagnostics = Diagnostics::default();
        {
            let mut actions = SemanticActions::new(&mut document);
            GrammarEngine::new(&source).recognize(&mut actions, &mut diagnostics);
        }

        if !diagnostics.problems.is_empty() {
            return Err(ConvertError::Parse {
                path: source_path,
                problems: diagnostics.problems,
            });
        }

        if options.named_component {
            document.set_component_name(component_name);
        }
        if options.embed_source {
            document.set_source_text(source);
        }

        Ok(document)
    }
}

/// Syntax problems of one recognition pass
#[derive(Debug, Default)]
struct Diagnostics {
    problems: Vec<SyntaxProblem>,
}

impl ErrorListener for Diagnostics {
    fn syntax_error(&mut self, line: usize, column: usize, message: &str) {
        self.problems.push(SyntaxProblem::new(line, column, message));
    }

    fn report_ambiguity(&mut self, line: usize, column: usize, reason: &str) {
        debug!(line, column, reason, "ambiguity ignored");
    }

    fn report_context_sensitivity(&mut self, line: usize, column: usize, reason: &str) {
        debug!(line, column, reason, "context sensitivity ignored");
    }
}

/// Prefix the route with `/` unless it already has one
pub fn normalize_route(route_path: &str) -> String {
    if route_path.starts_with('/') {
        route_path.to_string()
    } else {
        format!("/{}", route_path)
    }
}

/// Class name for a route: last path segment, extension stripped, camelized
pub fn derive_class_name(route_path: &str) -> String {
    let segment = route_path.rsplit('/').next().unwrap_or(route_path);
    let stem = match segment.rfind('.') {
        Some(dot) => &segment[..dot],
        None => segment,
    };
    camelize(stem)
}

/// `user_list` becomes `UserList`; a name without separators is kept as written
pub fn camelize(name: &str) -> String {
    if !name.contains(CLASS_NAME_SEPARATOR) {
        return name.to_string();
    }

    name.split(CLASS_NAME_SEPARATOR)
        .filter(|part| !part.is_empty())
        .map(proper_case)
        .collect()
}

fn proper_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            let mut proper: String = first.to_uppercase().collect();
            proper.push_str(&chars.as_str().to_lowercase());
            proper
        }
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jsp::ir::{MarkupCode, Node};
    use std::cell::Cell;
    use std::io::{self, Cursor};
    use std::rc::Rc;

    fn driver(source: &str, route: &str) -> Driver<Cursor<Vec<u8>>> {
        Driver::new(
            Cursor::new(source.as_bytes().to_vec()),
            "jsp/page.jsp",
            "com.test",
            route,
        )
        .unwrap()
    }

    #[test]
    fn test_names() {
        let driver = driver("", "a/my_page.jsp");
        assert_eq!(driver.class_name(), "MyPage");
        assert_eq!(driver.component_name(), "com.test-MyPage");
        assert_eq!(driver.route_path(), "/a/my_page.jsp");
    }

    #[test]
    fn test_camelize() {
        assert_eq!(camelize("test"), "test");
        assert_eq!(camelize("USER_LIST"), "UserList");
        assert_eq!(camelize("__a__b_"), "AB");
        assert_eq!(camelize("_"), "");
    }

    #[test]
    fn test_extension_only_stripped_from_last_segment() {
        assert_eq!(derive_class_name("v1.2/user_list"), "UserList");
        assert_eq!(derive_class_name("a/b.c/page.jsp"), "page");
        assert_eq!(derive_class_name("archive.tar.jsp"), "archive.tar");
    }

    #[test]
    fn test_unusable_route_is_rejected() {
        let result = Driver::new(Cursor::new(Vec::new()), "x.jsp", "p", "pages/.jsp");
        assert!(matches!(result, Err(ConvertError::InvalidRoute(route)) if route == "pages/.jsp"));
    }

    #[test]
    fn test_run_builds_document() {
        let document = driver("<%@ page import=\"java.util.List\" %><p><%= a %></p>", "test.jsp")
            .run()
            .unwrap();

        assert_eq!(document.class_name(), "test");
        assert_eq!(document.route_path(), "/test.jsp");
        assert_eq!(document.imports().len(), 1);
        assert_eq!(document.codes().len(), 3);
        assert_eq!(document.component_name(), None);
        assert!(document.to_code().contains("Original JSP code as follows"));
    }

    #[test]
    fn test_options() {
        let options = DriverOptions {
            embed_source: false,
            named_component: true,
        };
        let document = driver("<p/>", "test.jsp").with_options(options).run().unwrap();
        let code = document.to_code();

        assert!(code.contains("@Stateless(name=\"com.test-test\")\n"));
        assert!(!code.contains("Original JSP code"));
    }

    #[test]
    fn test_all_problems_are_collected() {
        let error = driver("<%-- open\n<%@ bogus %>", "test.jsp").run().unwrap_err();

        let problems = error.problems();
        assert_eq!(problems.len(), 2);
        assert_eq!((problems[0].line, problems[0].column), (1, 0));
        assert_eq!((problems[1].line, problems[1].column), (2, 0));
        assert!(error.to_string().starts_with("problems parsing jsp/page.jsp:\n"));
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk gone"))
        }
    }

    #[test]
    fn test_read_failure_is_io_error() {
        let error = Driver::new(FailingReader, "jsp/page.jsp", "p", "page.jsp")
            .unwrap()
            .run()
            .unwrap_err();
        assert!(matches!(error, ConvertError::Io { ref path, .. } if path == "jsp/page.jsp"));
    }

    #[test]
    fn test_ignored_signals_do_not_fail_conversion() {
        let document = driver(
            "<%@ page contentType=\"text/html\" %><fmt:formatDate/>",
            "test.jsp",
        )
        .run()
        .unwrap();

        assert_eq!(
            document.codes(),
            &[Node::from(MarkupCode::new("<fmt:formatDate/>"))]
        );
    }

    #[test]
    fn test_doc_comment_after_directive_goes_to_header() {
        let options = DriverOptions {
            embed_source: false,
            named_component: false,
        };
        let code = driver(
            "<%@ page import=\"a.B\" %>\n<%-- Page doc --%>\n<% x(); %>",
            "test.jsp",
        )
        .with_options(options)
        .run()
        .unwrap()
        .to_code();

        let comment = code.find("/*\nPage doc\n*/\n").unwrap();
        let annotation = code.find("@Stateless\n").unwrap();
        assert!(comment < annotation);
        assert_eq!(code.matches("Page doc").count(), 1);
    }

    /// Counts how many times the reader is dropped
    struct CountedReader<R> {
        inner: R,
        drops: Rc<Cell<usize>>,
    }

    impl<R: Read> Read for CountedReader<R> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.inner.read(buf)
        }
    }

    impl<R> Drop for CountedReader<R> {
        fn drop(&mut self) {
            self.drops.set(self.drops.get() + 1);
        }
    }

    fn run_counted<R: Read>(inner: R) -> (Result<Document, ConvertError>, usize) {
        let drops = Rc::new(Cell::new(0));
        let reader = CountedReader {
            inner,
            drops: Rc::clone(&drops),
        };
        let result = Driver::new(reader, "jsp/page.jsp", "p", "page.jsp")
            .unwrap()
            .run();
        (result, drops.get())
    }

    #[test]
    fn test_input_released_once_on_success() {
        let (result, drops) = run_counted(Cursor::new(b"<p><%= a %></p>".to_vec()));
        assert!(result.is_ok());
        assert_eq!(drops, 1);
    }

    #[test]
    fn test_input_released_once_on_parse_failure() {
        let (result, drops) = run_counted(Cursor::new(b"<%= a".to_vec()));
        assert!(matches!(result, Err(ConvertError::Parse { .. })));
        assert_eq!(drops, 1);
    }

    #[test]
    fn test_input_released_once_on_read_failure() {
        let (result, drops) = run_counted(FailingReader);
        assert!(matches!(result, Err(ConvertError::Io { .. })));
        assert_eq!(drops, 1);
    }

    #[test]
    fn test_open_missing_file() {
        let result = Driver::open("does/not/exist.jsp", "p", "exist.jsp");
        assert!(matches!(result, Err(ConvertError::Io { .. })));
    }
}
