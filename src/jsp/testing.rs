//! Testing utilities
//!
//! Two helpers shared by unit and integration tests:
//!
//! - [`JspSources`] gives access to the verified sample templates under `docs/samples/`.
//!   Tests should load these instead of pasting template text, so that every test runs
//!   against the same canonical inputs.
//! - [`assert_java`] starts a fluent assertion over generated Java text.
//!
//! # Example
//!
//! ```text
//! let document = JspSources::convert("mixed.jsp", "com.example").unwrap();
//!
//! assert_java(&document.to_code())
//!     .class_name("Mixed")
//!     .route("/mixed.jsp")
//!     .markup_writes(3)
//!     .in_order(&["@GET @POST", "out.print(user)", "return stringOut.toString();"]);
//! ```

use crate::jsp::driver::Driver;
use crate::jsp::error::ConvertError;
use crate::jsp::ir::Document;
use crate::jsp::processor::ProcessingError;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Available sample files (canonical sources)
pub const AVAILABLE_SAMPLES: &[&str] = &["minimal.jsp", "mixed.jsp", "bundles.jsp", "broken.jsp"];

/// Main interface for accessing sample templates
pub struct JspSources;

impl JspSources {
    fn samples_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("docs/samples")
    }

    /// Full path of a sample file
    pub fn sample_path(filename: &str) -> Result<PathBuf, ProcessingError> {
        if !AVAILABLE_SAMPLES.contains(&filename) {
            return Err(ProcessingError::IoError(format!(
                "Sample '{}' is not available. Available samples: {:?}",
                filename, AVAILABLE_SAMPLES
            )));
        }
        Ok(Self::samples_dir().join(filename))
    }

    /// Raw template text
    pub fn get_string(filename: &str) -> Result<String, ProcessingError> {
        let path = Self::sample_path(filename)?;
        fs::read_to_string(&path)
            .map_err(|e| ProcessingError::IoError(format!("Failed to read {}: {}", path.display(), e)))
    }

    /// Convert a sample with default options; the file name is the route
    pub fn convert(filename: &str, package: &str) -> Result<Document, ConvertError> {
        let path = Self::sample_path(filename).map_err(|e| {
            ConvertError::from_io(filename, io::Error::new(io::ErrorKind::NotFound, e.to_string()))
        })?;
        Driver::open(path, package, filename)?.run()
    }

    pub fn list_samples() -> Vec<&'static str> {
        AVAILABLE_SAMPLES.to_vec()
    }
}

/// Start a fluent assertion over generated Java
pub fn assert_java(code: &str) -> JavaAssertion<'_> {
    JavaAssertion { code }
}

pub struct JavaAssertion<'a> {
    code: &'a str,
}

impl<'a> JavaAssertion<'a> {
    pub fn contains(self, needle: &str) -> Self {
        assert!(
            self.code.contains(needle),
            "expected generated code to contain {:?}\n---\n{}",
            needle,
            self.code
        );
        self
    }

    pub fn not_contains(self, needle: &str) -> Self {
        assert!(
            !self.code.contains(needle),
            "expected generated code not to contain {:?}\n---\n{}",
            needle,
            self.code
        );
        self
    }

    /// Every needle is present, each one after the previous
    pub fn in_order(self, needles: &[&str]) -> Self {
        let mut rest = self.code;
        for needle in needles {
            match rest.find(needle) {
                Some(index) => rest = &rest[index + needle.len()..],
                None => panic!(
                    "expected {:?} after the previous needles in\n---\n{}",
                    needle, self.code
                ),
            }
        }
        self
    }

    pub fn class_name(self, name: &str) -> Self {
        self.contains(&format!("\npublic class {} {{\n", name))
    }

    pub fn route(self, route: &str) -> Self {
        self.contains(&format!("\n@Path(\"{}\")\n", route))
    }

    /// The package declaration, either first in the text or on a line of its own
    pub fn package(self, package: &str) -> Self {
        let declaration = format!("package {};\n", package);
        assert!(
            self.code.starts_with(&declaration) || self.code.contains(&format!("\n{}", declaration)),
            "expected package declaration {:?} in\n---\n{}",
            declaration,
            self.code
        );
        self
    }

    /// Number of `out.print("...")` markup statements
    pub fn markup_writes(self, count: usize) -> Self {
        let found = self.code.matches("\t\tout.print(\"").count();
        assert_eq!(found, count, "markup writes in\n---\n{}", self.code);
        self
    }

    pub fn occurrences(self, needle: &str, count: usize) -> Self {
        let found = self.code.matches(needle).count();
        assert_eq!(found, count, "occurrences of {:?} in\n---\n{}", needle, self.code);
        self
    }
}
