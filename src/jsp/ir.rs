//! Intermediate representation
//!
//! The IR is produced by the semantic adapter while the grammar engine walks a template,
//! and consumed once, by [`Document::to_code`], to produce the generated class.

pub mod document;
mod escape;
pub mod node;
pub mod rewrite;

pub use document::Document;
pub use node::{
    BundleSet, BundleVariable, Comment, Declaration, ExpressionCode, Import, MarkupCode, Node,
    Render, ScriptletCode,
};
