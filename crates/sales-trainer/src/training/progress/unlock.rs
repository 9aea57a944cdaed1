use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::record::ModuleProgress;
use crate::training::catalog::{Catalog, Difficulty};
use crate::training::error::ConfigurationError;

/// Pass scores per tier. The INTERMEDIATE value also gates ADVANCED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnlockPolicy {
    pub beginner_pass: u32,
    pub intermediate_pass: u32,
    pub advanced_pass: u32,
}

impl Default for UnlockPolicy {
    fn default() -> Self {
        Self {
            beginner_pass: 70,
            intermediate_pass: 75,
            advanced_pass: 80,
        }
    }
}

impl UnlockPolicy {
    pub fn pass_score(&self, tier: Difficulty) -> u32 {
        match tier {
            Difficulty::Beginner => self.beginner_pass,
            Difficulty::Intermediate => self.intermediate_pass,
            Difficulty::Advanced => self.advanced_pass,
        }
    }
}

/// Whether `tier` is open given the recorded progress. A tier above BEGINNER needs at least
/// one record in the tier below, and every such record completed at the lower pass score.
pub fn can_unlock(tier: Difficulty, progress: &[ModuleProgress], policy: &UnlockPolicy) -> bool {
    let Some(lower) = tier.prerequisite() else {
        return true;
    };
    let threshold = policy.pass_score(lower);
    let mut records = progress
        .iter()
        .filter(|entry| entry.difficulty == lower)
        .peekable();
    records.peek().is_some()
        && records.all(|entry| entry.completed && entry.score >= threshold)
}

/// Tiers currently open, lowest first.
pub fn unlocked_tiers(progress: &[ModuleProgress], policy: &UnlockPolicy) -> Vec<Difficulty> {
    Difficulty::ALL
        .into_iter()
        .filter(|tier| can_unlock(*tier, progress, policy))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LockReason {
    PriorTierIncomplete { tier: Difficulty },
    ModuleIncomplete { module_ids: Vec<String> },
}

impl LockReason {
    pub fn message(&self) -> String {
        match self {
            LockReason::PriorTierIncomplete { tier } => {
                format!("Complete all {} modules first", tier.label().to_lowercase())
            }
            LockReason::ModuleIncomplete { module_ids } => {
                format!("Complete {} first", module_ids.join(", "))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleAccess {
    pub accessible: bool,
    pub reason: Option<LockReason>,
}

/// A module is open once every module it names as a prerequisite is completed.
pub fn module_accessible(
    module_id: &str,
    progress: &[ModuleProgress],
    catalog: &Catalog,
    policy: &UnlockPolicy,
) -> Result<ModuleAccess, ConfigurationError> {
    let module = catalog.module(module_id)?;
    let missing: Vec<String> = module
        .unlock_criteria
        .required_module_ids
        .iter()
        .filter(|required| {
            !progress
                .iter()
                .any(|entry| &entry.module_id == *required && entry.completed)
        })
        .cloned()
        .collect();

    if missing.is_empty() {
        return Ok(ModuleAccess {
            accessible: true,
            reason: None,
        });
    }

    let reason = match module.difficulty.prerequisite() {
        Some(lower) if !can_unlock(module.difficulty, progress, policy) => {
            LockReason::PriorTierIncomplete { tier: lower }
        }
        _ => LockReason::ModuleIncomplete {
            module_ids: missing,
        },
    };
    Ok(ModuleAccess {
        accessible: false,
        reason: Some(reason),
    })
}

/// Sections without criteria are open. Otherwise each required section's BEGINNER modules
/// must be completed at the section's minimum score.
pub fn section_unlocked(
    section_id: &str,
    progress: &[ModuleProgress],
    catalog: &Catalog,
) -> Result<bool, ConfigurationError> {
    let section = catalog.section(section_id)?;
    let Some(criteria) = &section.unlock_criteria else {
        return Ok(true);
    };

    for required in &criteria.section_ids {
        let required = catalog.section(required)?;
        let satisfied = required
            .modules
            .iter()
            .filter(|module| module.difficulty == Difficulty::Beginner)
            .all(|module| {
                progress.iter().any(|entry| {
                    entry.module_id == module.id
                        && entry.completed
                        && entry.score >= criteria.min_score
                })
            });
        if !satisfied {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Percentage (0-100, rounded) of recorded modules completed, per tier.
pub fn tier_completion(progress: &[ModuleProgress]) -> BTreeMap<Difficulty, u32> {
    Difficulty::ALL
        .into_iter()
        .map(|tier| {
            let (total, completed) = progress
                .iter()
                .filter(|entry| entry.difficulty == tier)
                .fold((0u32, 0u32), |(total, completed), entry| {
                    (total + 1, completed + u32::from(entry.completed))
                });
            let percent = if total == 0 {
                0
            } else {
                (f64::from(completed) / f64::from(total) * 100.0).round() as u32
            };
            (tier, percent)
        })
        .collect()
}

/// Everything a module card needs to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleStatus {
    pub module_id: String,
    pub accessible: bool,
    pub lock_message: Option<String>,
    pub completed: bool,
    pub score: u32,
    pub attempts: u32,
    pub minimum_score_required: u32,
}

pub fn module_status(
    module_id: &str,
    progress: &[ModuleProgress],
    catalog: &Catalog,
    policy: &UnlockPolicy,
) -> Result<ModuleStatus, ConfigurationError> {
    let module = catalog.module(module_id)?;
    let access = module_accessible(module_id, progress, catalog, policy)?;
    let record = progress.iter().find(|entry| entry.module_id == module_id);

    Ok(ModuleStatus {
        module_id: module.id.clone(),
        accessible: access.accessible,
        lock_message: access.reason.as_ref().map(LockReason::message),
        completed: record.is_some_and(|entry| entry.completed),
        score: record.map_or(0, |entry| entry.score),
        attempts: record.map_or(0, |entry| entry.attempts),
        minimum_score_required: module.required_score,
    })
}
