//! Main module for jsp2rest library functionality

pub mod adapter;
pub mod config;
pub mod driver;
pub mod error;
pub mod grammar;
pub mod ir;
pub mod lexer;
pub mod position;
pub mod processor;
pub mod testing;

pub use driver::{Driver, DriverOptions};
pub use error::{ConvertError, SyntaxProblem};
pub use ir::Document;
