//! Diagnostic types and message lookup for the lattice.
//!
//! Narrowing never aborts: contradictions and missing hierarchy facts are
//! recorded as diagnostics and analysis continues with a fallback. Messages are
//! stored as templates with `{0}`, `{1}` placeholders and rendered once when
//! the diagnostic is created.

use serde::Serialize;

// =============================================================================
// Diagnostic Types
// =============================================================================

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticCategory {
    Warning = 0,
    Error = 1,
    Suggestion = 2,
    Message = 3,
}

/// A diagnostic message definition with code, category, and message template.
#[derive(Clone, Copy, Debug)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

/// A lattice diagnostic.
///
/// `node` identifies the expression node the diagnostic is about when it comes
/// from propagation; `subject` names the class for hierarchy diagnostics.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: u32,
    pub message_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Extra lines (e.g. the two type-sets that conflicted).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub related_information: Vec<String>,
}

impl Diagnostic {
    /// Create a diagnostic from a registered code, filling in the template.
    ///
    /// Unknown codes produce an error diagnostic whose text is the joined args.
    #[must_use]
    pub fn from_code(code: u32, args: &[&str]) -> Self {
        let (category, message_text) = match get_diagnostic_message(code) {
            Some(msg) => (msg.category, format_message(msg.message, args)),
            None => (DiagnosticCategory::Error, args.join(" ")),
        };
        Self {
            category,
            code,
            message_text,
            node: None,
            subject: None,
            related_information: Vec::new(),
        }
    }

    /// Attach the expression node this diagnostic refers to.
    #[must_use]
    pub fn at_node(mut self, node: u32) -> Self {
        self.node = Some(node);
        self
    }

    /// Attach the class name this diagnostic refers to.
    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Add a related line.
    #[must_use]
    pub fn with_related(mut self, message: impl Into<String>) -> Self {
        self.related_information.push(message.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}

// =============================================================================
// Message Table
// =============================================================================

pub mod diagnostic_codes {
    pub const TYPE_CONFLICT: u32 = 1001;
    pub const INCOMPLETE_HIERARCHY: u32 = 1002;
    pub const HIERARCHY_DEPTH_EXCEEDED: u32 = 1003;
    pub const PROPAGATION_LIMIT_REACHED: u32 = 1004;
    pub const MALFORMED_DESCRIPTOR: u32 = 1005;
}

pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    DiagnosticMessage {
        code: diagnostic_codes::TYPE_CONFLICT,
        category: DiagnosticCategory::Error,
        message: "Type conflict at node {0}: '{1}' cannot be narrowed to '{2}'.",
    },
    DiagnosticMessage {
        code: diagnostic_codes::INCOMPLETE_HIERARCHY,
        category: DiagnosticCategory::Warning,
        message: "Hierarchy of '{0}' is incomplete; subtype answers involving it are guesses.",
    },
    DiagnosticMessage {
        code: diagnostic_codes::HIERARCHY_DEPTH_EXCEEDED,
        category: DiagnosticCategory::Warning,
        message: "Hierarchy walk from '{0}' exceeded {1} levels; ancestry truncated.",
    },
    DiagnosticMessage {
        code: diagnostic_codes::PROPAGATION_LIMIT_REACHED,
        category: DiagnosticCategory::Error,
        message: "Type propagation stopped after {0} steps without reaching a fixpoint.",
    },
    DiagnosticMessage {
        code: diagnostic_codes::MALFORMED_DESCRIPTOR,
        category: DiagnosticCategory::Error,
        message: "Malformed descriptor '{0}'.",
    },
];

/// Look up a diagnostic message definition by code.
#[must_use]
pub fn get_diagnostic_message(code: u32) -> Option<&'static DiagnosticMessage> {
    DIAGNOSTIC_MESSAGES.iter().find(|m| m.code == code)
}

/// Get the message template for a diagnostic code.
#[must_use]
pub fn get_message_template(code: u32) -> Option<&'static str> {
    get_diagnostic_message(code).map(|m| m.message)
}

/// Format a diagnostic message by replacing {0}, {1}, etc. with arguments.
#[must_use]
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

#[cfg(test)]
#[path = "../tests/diagnostics_tests.rs"]
mod tests;
