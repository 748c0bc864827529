//! User-facing notifications emitted by every game action.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Banner severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum Severity {
    /// The action went through.
    Ok,
    /// The action was rejected or could not be saved.
    Err,
}

/// A message for the status banner plus its severity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Notice {
    /// Human-readable text.
    pub message: String,
    /// `ok` or `err`.
    pub severity: Severity,
}

impl Notice {
    /// A success notice.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Ok,
        }
    }

    /// An error notice.
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Err,
        }
    }

    /// Whether this notice reports success.
    pub fn is_ok(&self) -> bool {
        self.severity == Severity::Ok
    }
}

impl core::fmt::Display for Notice {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let tag = match self.severity {
            Severity::Ok => "ok",
            Severity::Err => "err",
        };
        write!(f, "[{tag}] {}", self.message)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn severity_serializes_lowercase() {
        let json = serde_json::to_string(&Notice::err("nope")).unwrap();
        assert_eq!(json, r#"{"message":"nope","severity":"err"}"#);
    }

    #[test]
    fn display_includes_tag() {
        assert_eq!(Notice::ok("Guard hired.").to_string(), "[ok] Guard hired.");
    }
}
