use serde::Serialize;

use super::domain::Section;

/// Non-fatal content issue found while loading the catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentWarning {
    pub location: String,
    pub kind: WarningKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WarningKind {
    /// Totals are combined unnormalized, so anything other than 100 shifts the scale.
    WeightsDoNotSumTo100 { total: f64 },
    EmptyKeyPhrases { category: String },
    ModuleWithoutScenarios,
}

impl ContentWarning {
    pub fn message(&self) -> String {
        match &self.kind {
            WarningKind::WeightsDoNotSumTo100 { total } => {
                format!("rubric weights sum to {total}, expected 100")
            }
            WarningKind::EmptyKeyPhrases { category } => {
                format!("category '{category}' has no key phrases and can only score 0")
            }
            WarningKind::ModuleWithoutScenarios => "module has no scenarios".to_string(),
        }
    }
}

pub(super) fn lint_sections(sections: &[Section]) -> Vec<ContentWarning> {
    let mut warnings = Vec::new();

    for module in sections.iter().flat_map(|section| section.modules.iter()) {
        if module.scenarios.is_empty() {
            warnings.push(ContentWarning {
                location: module.id.clone(),
                kind: WarningKind::ModuleWithoutScenarios,
            });
        }

        for (index, scenario) in module.scenarios.iter().enumerate() {
            let location = format!("{}#{}", module.id, index);
            let total = scenario.rubric.total_weight();
            if (total - 100.0).abs() > f64::EPSILON {
                warnings.push(ContentWarning {
                    location: location.clone(),
                    kind: WarningKind::WeightsDoNotSumTo100 { total },
                });
            }
            for (name, category) in scenario.rubric.iter() {
                if category.key_phrases.iter().all(|phrase| phrase.trim().is_empty()) {
                    warnings.push(ContentWarning {
                        location: location.clone(),
                        kind: WarningKind::EmptyKeyPhrases {
                            category: name.clone(),
                        },
                    });
                }
            }
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::catalog::{Catalog, Difficulty, Module, UnlockCriteria};

    #[test]
    fn flags_modules_without_scenarios() {
        let section = Section {
            id: "recap".to_string(),
            title: "Recap".to_string(),
            description: String::new(),
            required_score: 70,
            completion_phrases: Vec::new(),
            unlock_criteria: None,
            modules: vec![Module {
                id: "recap-beginner".to_string(),
                title: "Recap".to_string(),
                description: String::new(),
                difficulty: Difficulty::Beginner,
                required_score: 70,
                unlock_criteria: UnlockCriteria::default(),
                scenarios: Vec::new(),
            }],
        };

        let warnings = lint_sections(&[section]);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::ModuleWithoutScenarios);
        assert_eq!(warnings[0].location, "recap-beginner");
    }

    #[test]
    fn reports_rubrics_that_do_not_sum_to_100() {
        let catalog = Catalog::standard().expect("standard catalog");
        let warnings = catalog.lint();

        // Application intermediate adds a trustBuilding category on top of the base three.
        assert!(warnings.iter().any(|warning| {
            warning.location == "application-intermediate#0"
                && matches!(warning.kind, WarningKind::WeightsDoNotSumTo100 { total } if total == 140.0)
        }));
        assert!(warnings
            .iter()
            .all(|warning| !warning.location.starts_with("intake-beginner")));
    }
}
