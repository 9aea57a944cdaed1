use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::training::catalog::{Catalog, Difficulty};
use crate::training::error::ConfigurationError;

/// One trainee's standing on one module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleProgress {
    pub module_id: String,
    pub difficulty: Difficulty,
    pub completed: bool,
    /// Best score ever recorded; never decreases.
    pub score: u32,
    pub attempts: u32,
    pub last_attempted_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl ModuleProgress {
    pub fn new(module_id: impl Into<String>, difficulty: Difficulty) -> Self {
        Self {
            module_id: module_id.into(),
            difficulty,
            completed: false,
            score: 0,
            attempts: 0,
            last_attempted_at: None,
            completed_at: None,
        }
    }
}

/// Records one scored attempt and returns the updated list.
///
/// `completed` reflects this attempt against the module's required score; `score` keeps the
/// best result and `completed_at` keeps the first passing attempt.
pub fn record_attempt(
    progress: &[ModuleProgress],
    catalog: &Catalog,
    module_id: &str,
    score: u32,
    now: DateTime<Utc>,
) -> Result<Vec<ModuleProgress>, ConfigurationError> {
    let module = catalog.module(module_id)?;
    let mut updated = progress.to_vec();

    let index = match updated.iter().position(|entry| entry.module_id == module_id) {
        Some(index) => index,
        None => {
            updated.push(ModuleProgress::new(module_id, module.difficulty));
            updated.len() - 1
        }
    };

    let entry = &mut updated[index];
    let passed = score >= module.required_score;
    entry.score = entry.score.max(score);
    entry.completed = passed;
    entry.attempts += 1;
    entry.last_attempted_at = Some(now);
    if passed && entry.completed_at.is_none() {
        entry.completed_at = Some(now);
    }

    debug!(
        module = module_id,
        score,
        best = entry.score,
        attempts = entry.attempts,
        passed,
        "attempt recorded"
    );
    Ok(updated)
}
