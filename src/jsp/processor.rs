//! Staged processing of templates for inspection
//!
//! This module exposes the intermediate products of a conversion (tokens, IR) next to
//! the final Java, each in one or more output formats. A format string names the stage
//! and the format, e.g. `token-simple` or `ir-yaml`; `java` names the generated class.
//!
//! ## Example Usage
//!
//! ```text
//! let spec = ProcessingSpec::from_string("ir-json")?;
//! let dump = process_file("docs/samples/mixed.jsp", &spec)?;
//! ```

use crate::jsp::driver::Driver;
use crate::jsp::error::ConvertError;
use crate::jsp::ir::Document;
use crate::jsp::lexer::{tokenize, tokenize_with_spans};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// What data to extract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    Token,
    Ir,
    Java,
}

/// How to print it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Simple,
    Json,
    Yaml,
    Java,
}

/// A complete processing specification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingSpec {
    pub stage: ProcessingStage,
    pub format: OutputFormat,
}

impl ProcessingSpec {
    /// Parse a format string like "token-simple" or "ir-yaml"
    pub fn from_string(format_str: &str) -> Result<Self, ProcessingError> {
        if format_str == "java" {
            return Ok(ProcessingSpec {
                stage: ProcessingStage::Java,
                format: OutputFormat::Java,
            });
        }

        let (stage, format) = format_str
            .split_once('-')
            .ok_or_else(|| ProcessingError::InvalidFormat(format_str.to_string()))?;

        let stage = match stage {
            "token" => ProcessingStage::Token,
            "ir" => ProcessingStage::Ir,
            _ => return Err(ProcessingError::InvalidStage(stage.to_string())),
        };

        let format = match format {
            "simple" => OutputFormat::Simple,
            "json" => OutputFormat::Json,
            "yaml" => OutputFormat::Yaml,
            _ => return Err(ProcessingError::InvalidFormatType(format.to_string())),
        };

        match (stage, format) {
            (ProcessingStage::Token, OutputFormat::Yaml) => Err(
                ProcessingError::InvalidFormatType("yaml only works with the ir stage".to_string()),
            ),
            (ProcessingStage::Ir, OutputFormat::Simple) => Err(ProcessingError::InvalidFormatType(
                "simple only works with the token stage".to_string(),
            )),
            _ => Ok(ProcessingSpec { stage, format }),
        }
    }

    /// Get all available processing specifications
    pub fn available_specs() -> Vec<ProcessingSpec> {
        vec![
            ProcessingSpec {
                stage: ProcessingStage::Token,
                format: OutputFormat::Simple,
            },
            ProcessingSpec {
                stage: ProcessingStage::Token,
                format: OutputFormat::Json,
            },
            ProcessingSpec {
                stage: ProcessingStage::Ir,
                format: OutputFormat::Json,
            },
            ProcessingSpec {
                stage: ProcessingStage::Ir,
                format: OutputFormat::Yaml,
            },
            ProcessingSpec {
                stage: ProcessingStage::Java,
                format: OutputFormat::Java,
            },
        ]
    }

    /// The format string that parses back into this spec
    pub fn name(&self) -> String {
        let stage = match self.stage {
            ProcessingStage::Token => "token",
            ProcessingStage::Ir => "ir",
            ProcessingStage::Java => return "java".to_string(),
        };
        let format = match self.format {
            OutputFormat::Simple => "simple",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
            OutputFormat::Java => "java",
        };
        format!("{}-{}", stage, format)
    }
}

/// Errors that can occur during processing
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
    #[error("Invalid stage: {0}")]
    InvalidStage(String),
    #[error("Invalid format type: {0}")]
    InvalidFormatType(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error(transparent)]
    Convert(#[from] ConvertError),
    #[error("Serialization failed: {0}")]
    Serialize(String),
}

/// Process a template file according to the given specification
pub fn process_file<P: AsRef<Path>>(
    file_path: P,
    spec: &ProcessingSpec,
) -> Result<String, ProcessingError> {
    let file_path = file_path.as_ref();
    let content = fs::read_to_string(file_path)
        .map_err(|e| ProcessingError::IoError(format!("{}: {}", file_path.display(), e)))?;
    process_source(&content, &file_path.display().to_string(), spec)
}

/// Process template text; the route is taken from the file name of `source_path`
pub fn process_source(
    source: &str,
    source_path: &str,
    spec: &ProcessingSpec,
) -> Result<String, ProcessingError> {
    match spec.stage {
        ProcessingStage::Token => format_tokens(source, spec.format),
        ProcessingStage::Ir => {
            let document = convert(source, source_path)?;
            format_document(&document, spec.format)
        }
        ProcessingStage::Java => Ok(convert(source, source_path)?.to_code()),
    }
}

fn convert(source: &str, source_path: &str) -> Result<Document, ProcessingError> {
    let route = source_path.rsplit(['/', '\\']).next().unwrap_or(source_path);
    let driver = Driver::new(source.as_bytes(), source_path, "", route)?;
    Ok(driver.run()?)
}

fn format_tokens(source: &str, format: OutputFormat) -> Result<String, ProcessingError> {
    match format {
        OutputFormat::Simple => {
            let mut result = String::new();
            for (token, span) in tokenize_with_spans(source) {
                match token {
                    Ok(token) => result.push_str(&format!("{} {:?}", token, span)),
                    Err(error) => result.push_str(&format!("<error: {}> {:?}", error, span)),
                }
                result.push('\n');
            }
            Ok(result)
        }
        OutputFormat::Json => serde_json::to_string_pretty(&tokenize(source))
            .map_err(|e| ProcessingError::Serialize(e.to_string())),
        _ => Err(ProcessingError::InvalidFormatType(
            "token stage prints simple or json".to_string(),
        )),
    }
}

fn format_document(document: &Document, format: OutputFormat) -> Result<String, ProcessingError> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(document)
            .map_err(|e| ProcessingError::Serialize(e.to_string())),
        OutputFormat::Yaml => {
            serde_yaml::to_string(document).map_err(|e| ProcessingError::Serialize(e.to_string()))
        }
        _ => Err(ProcessingError::InvalidFormatType(
            "ir stage prints json or yaml".to_string(),
        )),
    }
}

/// Get all available format strings
pub fn available_formats() -> Vec<String> {
    ProcessingSpec::available_specs()
        .iter()
        .map(ProcessingSpec::name)
        .collect()
}
