use std::sync::OnceLock;

use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::super::error::ConfigurationError;
use super::super::scoring::ScoringRubric;

/// Difficulty tier gating module access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Difficulty::Beginner => "BEGINNER",
            Difficulty::Intermediate => "INTERMEDIATE",
            Difficulty::Advanced => "ADVANCED",
        }
    }

    /// Tier whose completion unlocks this one.
    pub const fn prerequisite(self) -> Option<Difficulty> {
        match self {
            Difficulty::Beginner => None,
            Difficulty::Intermediate => Some(Difficulty::Beginner),
            Difficulty::Advanced => Some(Difficulty::Intermediate),
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "BEGINNER" => Some(Difficulty::Beginner),
            "INTERMEDIATE" => Some(Difficulty::Intermediate),
            "ADVANCED" => Some(Difficulty::Advanced),
            _ => None,
        }
    }
}

/// A training section groups the modules for one stage of the sales call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub title: String,
    pub description: String,
    pub required_score: u32,
    #[serde(default)]
    pub completion_phrases: Vec<String>,
    #[serde(default)]
    pub unlock_criteria: Option<SectionUnlockCriteria>,
    pub modules: Vec<Module>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionUnlockCriteria {
    pub section_ids: Vec<String>,
    pub min_score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub difficulty: Difficulty,
    pub required_score: u32,
    #[serde(default)]
    pub unlock_criteria: UnlockCriteria,
    pub scenarios: Vec<Scenario>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnlockCriteria {
    #[serde(default)]
    pub required_module_ids: Vec<String>,
    #[serde(default)]
    pub required_score: u32,
}

/// One scripted exchange: the agent line the trainee delivers and the rubric it is scored on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub prompt_script: String,
    pub expected_response: String,
    pub prospect_response: ProspectResponse,
    pub rubric: ScoringRubric,
    pub kind: ScenarioKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_prompt: Option<String>,
}

impl Scenario {
    /// Prospect line to speak back; multi-line scenarios pick uniformly.
    pub fn pick_prospect_line<G: Rng + ?Sized>(&self, rng: &mut G) -> &str {
        match &self.prospect_response {
            ProspectResponse::Single(line) => line.as_str(),
            ProspectResponse::Variants(lines) if lines.is_empty() => "",
            ProspectResponse::Variants(lines) => lines[rng.gen_range(0..lines.len())].as_str(),
        }
    }

    /// Checks a captured value (email, phone, address) against the scenario's format rule.
    pub fn validate_capture(&self, captured: &str) -> Result<CaptureVerdict, ConfigurationError> {
        match &self.kind {
            ScenarioKind::Conversational { .. } => Ok(CaptureVerdict::NotRequired),
            ScenarioKind::DataCapture { capture } => capture.check(captured),
        }
    }

    pub fn emotional_context(&self) -> Option<&EmotionalContext> {
        match &self.kind {
            ScenarioKind::Conversational { emotional_context } => emotional_context.as_ref(),
            ScenarioKind::DataCapture { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProspectResponse {
    Single(String),
    Variants(Vec<String>),
}

/// Scenario variants carry different presentation or validation data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioKind {
    Conversational {
        #[serde(
            default,
            rename = "emotionalContext",
            skip_serializing_if = "Option::is_none"
        )]
        emotional_context: Option<EmotionalContext>,
    },
    DataCapture {
        capture: CaptureRule,
    },
}

/// Presentation-only metadata for voicing the prospect. Never used in scoring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionalContext {
    #[serde(default)]
    pub mood: String,
    #[serde(default)]
    pub intensity: String,
    #[serde(default)]
    pub pacing: String,
    #[serde(default)]
    pub natural_pauses: Vec<NaturalPause>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NaturalPause {
    pub after: String,
    pub duration_ms: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureField {
    Email,
    Phone,
    Address,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureRule {
    pub field: CaptureField,
    pub pattern: String,
    pub format_hint: String,
    pub error_message: String,
    /// Filled on first use; catalog validation compiles every rule at load.
    #[serde(skip)]
    pub(super) compiled: OnceLock<Regex>,
}

impl CaptureRule {
    pub(crate) fn regex(&self) -> Result<&Regex, ConfigurationError> {
        if let Some(regex) = self.compiled.get() {
            return Ok(regex);
        }
        let regex = Regex::new(&self.pattern).map_err(|err| {
            ConfigurationError::InvalidContent(format!(
                "capture pattern for {:?} does not compile: {err}",
                self.field
            ))
        })?;
        Ok(self.compiled.get_or_init(|| regex))
    }

    pub fn check(&self, captured: &str) -> Result<CaptureVerdict, ConfigurationError> {
        let pattern = self.regex()?;
        if pattern.is_match(captured.trim()) {
            Ok(CaptureVerdict::Accepted)
        } else {
            Ok(CaptureVerdict::Rejected {
                message: self.error_message.clone(),
                format_hint: self.format_hint.clone(),
            })
        }
    }
}

impl PartialEq for CaptureRule {
    fn eq(&self, other: &Self) -> bool {
        self.field == other.field
            && self.pattern == other.pattern
            && self.format_hint == other.format_hint
            && self.error_message == other.error_message
    }
}

impl Eq for CaptureRule {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum CaptureVerdict {
    NotRequired,
    Accepted,
    Rejected { message: String, format_hint: String },
}
