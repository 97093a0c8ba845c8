//! Skill request value objects

use crate::constants::{
    CAPABILITY_ANALYSIS, CAPABILITY_CODE_GENERATION, CAPABILITY_MULTIMODAL,
    CAPABILITY_TEXT_GENERATION, CHARS_PER_INPUT_UNIT, DEFAULT_ACTION,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Trust level granted to the submitter of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TrustLevel {
    /// Unknown origin
    Untrusted,
    /// Regular user
    #[default]
    Basic,
    /// Verified operator
    Elevated,
    /// System-internal caller
    System,
}

/// Trust decision attached to a request by the policy collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustContext {
    /// Trust level of the submitter
    pub level: TrustLevel,
    /// Whether the policy allows this request to execute
    pub permitted: bool,
}

impl TrustContext {
    /// A permitted context at the given level
    pub fn permitted(level: TrustLevel) -> Self {
        Self {
            level,
            permitted: true,
        }
    }

    /// A denied context at the given level
    pub fn denied(level: TrustLevel) -> Self {
        Self {
            level,
            permitted: false,
        }
    }
}

impl Default for TrustContext {
    fn default() -> Self {
        Self::permitted(TrustLevel::Basic)
    }
}

/// Keyword fragments of a skill name mapped to the capability they require
const SKILL_KEYWORDS: &[(&str, &str)] = &[
    ("code", CAPABILITY_CODE_GENERATION),
    ("security", CAPABILITY_ANALYSIS),
    ("analysis", CAPABILITY_ANALYSIS),
    ("graphics", CAPABILITY_MULTIMODAL),
    ("audio", CAPABILITY_MULTIMODAL),
];

/// Derive the capabilities a skill requires from its name
///
/// Matching is case-insensitive; `text_generation` is always required.
pub fn required_capabilities(skill_name: &str) -> BTreeSet<String> {
    let lowered = skill_name.to_lowercase();
    let mut required = BTreeSet::from([CAPABILITY_TEXT_GENERATION.to_string()]);
    for (keyword, capability) in SKILL_KEYWORDS {
        if lowered.contains(keyword) {
            required.insert((*capability).to_string());
        }
    }
    required
}

/// Coarse token estimate for a payload: `ceil(serialized_chars / 4)`
///
/// The payload is measured as compact JSON, so a string counts its quotes.
pub fn estimate_units(payload: &serde_json::Value) -> u64 {
    let len = payload.to_string().chars().count();
    len.div_ceil(CHARS_PER_INPUT_UNIT) as u64
}

/// A request to execute a named skill
///
/// Requests are immutable once created; recovery derives new requests with
/// [`SkillRequest::with_payload`], which keeps the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillRequest {
    /// Unique id generated at submission
    pub id: Uuid,
    /// Skill being requested
    pub skill_name: String,
    /// Opaque payload passed to the backend
    pub payload: serde_json::Value,
    /// Capabilities derived from the skill name
    pub required_capabilities: BTreeSet<String>,
    /// Trust decision for the submitter
    pub trust: TrustContext,
    /// Submission time
    pub submitted_at: DateTime<Utc>,
}

impl SkillRequest {
    /// Create a request with a fresh id and the default trust context
    pub fn new(skill_name: impl Into<String>, payload: serde_json::Value) -> Self {
        let skill_name = skill_name.into();
        Self {
            id: Uuid::new_v4(),
            required_capabilities: required_capabilities(&skill_name),
            skill_name,
            payload,
            trust: TrustContext::default(),
            submitted_at: Utc::now(),
        }
    }

    /// Replace the trust context
    pub fn with_trust(mut self, trust: TrustContext) -> Self {
        self.trust = trust;
        self
    }

    /// Same request identity with a different payload
    pub fn with_payload(&self, payload: serde_json::Value) -> Self {
        Self {
            payload,
            ..self.clone()
        }
    }

    /// Estimated input size in units
    pub fn estimated_input_units(&self) -> u64 {
        estimate_units(&self.payload)
    }

    /// The payload's `action` field, or `"default"`
    pub fn action(&self) -> &str {
        self.payload
            .get("action")
            .and_then(serde_json::Value::as_str)
            .unwrap_or(DEFAULT_ACTION)
    }

    /// Key identifying equivalent requests for outcome caching
    pub fn cache_key(&self) -> String {
        format!("{}::{}", self.skill_name, self.action())
    }
}
