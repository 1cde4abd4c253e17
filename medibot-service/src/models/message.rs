use serde::{Deserialize, Serialize};
use std::fmt;

/// Shown when the model produced nothing usable as a reply.
pub const FALLBACK_REPLY: &str = "Sorry, I couldn't understand that.";

/// Body of `POST /api/message`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IncomingRequest {
    #[serde(default)]
    pub message: String,
}

/// Severity the model is asked to attach to its answer.
///
/// `Unknown` serializes as `""` and stands for "missing or unrecognized".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionLevel {
    #[default]
    #[serde(rename = "")]
    Unknown,
    Normal,
    Risky,
    Critical,
}

impl ConditionLevel {
    /// Map an untrusted upstream value onto the known levels.
    pub fn from_model(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "normal" => ConditionLevel::Normal,
            "risky" => ConditionLevel::Risky,
            "critical" => ConditionLevel::Critical,
            _ => ConditionLevel::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionLevel::Unknown => "",
            ConditionLevel::Normal => "normal",
            ConditionLevel::Risky => "risky",
            ConditionLevel::Critical => "critical",
        }
    }
}

impl fmt::Display for ConditionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response body of `POST /api/message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedReply {
    pub reply: String,
    pub condition_level: ConditionLevel,
    pub note: String,
}

impl ClassifiedReply {
    /// Reply carrying free text only, with no classification.
    ///
    /// Blank text is replaced by [`FALLBACK_REPLY`].
    pub fn unclassified(text: impl Into<String>) -> Self {
        let text = text.into();
        let reply = if text.trim().is_empty() {
            FALLBACK_REPLY.to_string()
        } else {
            text
        };

        Self {
            reply,
            condition_level: ConditionLevel::Unknown,
            note: String::new(),
        }
    }
}
