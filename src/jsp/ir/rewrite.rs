//! Textual rewrite rules
//!
//! Every textual substitution the converter performs lives in [`RULES`], an ordered
//! table of `(stage, scope, pattern, replacement)` entries. A rule always operates over
//! the entire text of the node that owns it, never over a fragment, and [`apply`] runs
//! each matching rule exactly once, in table order.
//!
//! Two stages exist:
//! - `Intake` rules run once, when the semantic adapter receives a construct. Their
//!   output is what gets stored in the IR.
//! - `Render` rules run every time a node renders. They are never stored back, so
//!   rendering twice cannot apply a rule twice.

use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};
use std::borrow::Cow;

/// When a rule runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Intake,
    Render,
}

/// Which text a rule operates on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// The whole body of one scriptlet block
    Scriptlet,
    /// The whole text of one member declaration
    Declaration,
    /// The raw template echoed in the trailing provenance comment
    SourceEcho,
}

/// Replacement written for every bare `return;` inside a scriptlet
pub const BUFFER_RETURN: &str = "return stringOut.toString();";

/// One entry of the rewrite table
#[derive(Debug, Clone, Copy)]
pub struct RewriteRule {
    pub stage: Stage,
    pub scope: Scope,
    pub pattern: &'static str,
    pub replacement: &'static str,
}

/// The complete, ordered rewrite table
pub const RULES: &[RewriteRule] = &[
    // The page context handle has no counterpart in a REST endpoint: drop its setup
    // call first, then point every other use at the request.
    RewriteRule {
        stage: Stage::Intake,
        scope: Scope::Scriptlet,
        pattern: r"PageContextFactory\.setPageContext\(pageContext\);\n?",
        replacement: "",
    },
    RewriteRule {
        stage: Stage::Intake,
        scope: Scope::Scriptlet,
        pattern: r"\bpageContext\b",
        replacement: "request",
    },
    RewriteRule {
        stage: Stage::Render,
        scope: Scope::Scriptlet,
        pattern: r"\breturn\s*;",
        replacement: BUFFER_RETURN,
    },
    RewriteRule {
        stage: Stage::Render,
        scope: Scope::Declaration,
        pattern: r"\bServletResponse\b",
        replacement: "HttpServletResponse",
    },
    // `/**` before `/*` so javadoc openers collapse into a single marker.
    RewriteRule {
        stage: Stage::Render,
        scope: Scope::SourceEcho,
        pattern: r"/\*\*",
        replacement: "START-COMMENT",
    },
    RewriteRule {
        stage: Stage::Render,
        scope: Scope::SourceEcho,
        pattern: r"/\*",
        replacement: "START-COMMENT",
    },
    RewriteRule {
        stage: Stage::Render,
        scope: Scope::SourceEcho,
        pattern: r"\*/",
        replacement: "END-COMMENT",
    },
];

static COMPILED: Lazy<Vec<(RewriteRule, Regex)>> = Lazy::new(|| {
    RULES
        .iter()
        .map(|rule| {
            let regex = Regex::new(rule.pattern).expect("rewrite patterns are valid regexes");
            (*rule, regex)
        })
        .collect()
});

/// Apply every rule of `stage` and `scope` to the whole of `text`, in table order
pub fn apply<'t>(stage: Stage, scope: Scope, text: &'t str) -> Cow<'t, str> {
    COMPILED
        .iter()
        .filter(|(rule, _)| rule.stage == stage && rule.scope == scope)
        .fold(Cow::Borrowed(text), |current, (rule, regex)| {
            let rewritten = match regex.replace_all(&current, NoExpand(rule.replacement)) {
                Cow::Borrowed(_) => None,
                Cow::Owned(rewritten) => Some(rewritten),
            };
            rewritten.map(Cow::Owned).unwrap_or(current)
        })
}
