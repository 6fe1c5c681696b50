//! # jsp2rest
//!
//! Translates legacy JSP pages into standalone, stateless JAX-RS endpoint classes.
//!
//! File Layout
//!
//! The conversion is a single sequential pass split into small stages, each in its own
//! module under `src/jsp`:
//! src/jsp
//!   ├── lexer      logos tokens for the JSP constructs
//!   ├── grammar    recognizes constructs and reports syntax problems
//!   ├── adapter    semantic actions that turn constructs into IR nodes
//!   ├── ir         nodes, rewrite rules and the aggregate document renderer
//!   ├── driver     naming, diagnostics collection and the public entry point
//!   ├── processor  token / IR / Java dumps for the `inspect` command
//!   └── config     layered TOML configuration for the binary
//!
//! For testing guidelines, see the [testing module](jsp::testing).

#![allow(rustdoc::invalid_html_tags)]

pub mod jsp;
