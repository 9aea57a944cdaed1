//! Read-only tree of training content: sections, tiered modules, and scripted scenarios.
//!
//! The catalog is validated once on construction and then shared by reference; nothing in the
//! scoring or progression code mutates it.

mod domain;
mod lint;

pub use domain::{
    CaptureField, CaptureRule, CaptureVerdict, Difficulty, EmotionalContext, Module,
    NaturalPause, ProspectResponse, Scenario, ScenarioKind, Section, SectionUnlockCriteria,
    UnlockCriteria,
};
pub use lint::{ContentWarning, WarningKind};

use std::collections::HashMap;
use std::io::Read;

use serde::Deserialize;
use tracing::{debug, warn};

use super::error::ConfigurationError;

const STANDARD_CATALOG: &str = include_str!("../../../content/catalog.json");

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    sections: Vec<Section>,
}

#[derive(Debug, Clone, Copy)]
struct ModuleSlot {
    section: usize,
    module: usize,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    sections: Vec<Section>,
    index: HashMap<String, ModuleSlot>,
}

impl Catalog {
    /// Validates the section tree and builds the module index.
    pub fn new(sections: Vec<Section>) -> Result<Self, ConfigurationError> {
        let mut index = HashMap::new();
        for (section_idx, section) in sections.iter().enumerate() {
            for (module_idx, module) in section.modules.iter().enumerate() {
                let slot = ModuleSlot {
                    section: section_idx,
                    module: module_idx,
                };
                if index.insert(module.id.clone(), slot).is_some() {
                    return Err(ConfigurationError::DuplicateModule(module.id.clone()));
                }
            }
        }

        let catalog = Self { sections, index };
        catalog.validate_references()?;
        catalog.validate_capture_patterns()?;

        for warning in catalog.lint() {
            warn!(location = %warning.location, "{}", warning.message());
        }
        debug!(
            sections = catalog.sections.len(),
            modules = catalog.index.len(),
            "training catalog loaded"
        );

        Ok(catalog)
    }

    /// The built-in content shipped with the crate.
    pub fn standard() -> Result<Self, ConfigurationError> {
        Self::from_json(STANDARD_CATALOG)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigurationError> {
        let document: CatalogDocument = serde_json::from_str(raw)
            .map_err(|err| ConfigurationError::InvalidContent(err.to_string()))?;
        Self::new(document.sections)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ConfigurationError> {
        let document: CatalogDocument = serde_json::from_reader(reader)
            .map_err(|err| ConfigurationError::InvalidContent(err.to_string()))?;
        Self::new(document.sections)
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, id: &str) -> Result<&Section, ConfigurationError> {
        self.sections
            .iter()
            .find(|section| section.id == id)
            .ok_or_else(|| ConfigurationError::UnknownSection(id.to_string()))
    }

    pub fn module(&self, id: &str) -> Result<&Module, ConfigurationError> {
        self.index
            .get(id)
            .map(|slot| &self.sections[slot.section].modules[slot.module])
            .ok_or_else(|| ConfigurationError::UnknownModule(id.to_string()))
    }

    pub fn section_of(&self, module_id: &str) -> Result<&Section, ConfigurationError> {
        self.index
            .get(module_id)
            .map(|slot| &self.sections[slot.section])
            .ok_or_else(|| ConfigurationError::UnknownModule(module_id.to_string()))
    }

    pub fn scenario(&self, module_id: &str, index: usize) -> Result<&Scenario, ConfigurationError> {
        self.module(module_id)?
            .scenarios
            .get(index)
            .ok_or_else(|| ConfigurationError::UnknownScenario {
                module_id: module_id.to_string(),
                index,
            })
    }

    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.sections.iter().flat_map(|section| section.modules.iter())
    }

    pub fn modules_by_difficulty(&self, difficulty: Difficulty) -> Vec<&Module> {
        self.modules()
            .filter(|module| module.difficulty == difficulty)
            .collect()
    }

    pub fn lint(&self) -> Vec<ContentWarning> {
        lint::lint_sections(&self.sections)
    }

    fn validate_references(&self) -> Result<(), ConfigurationError> {
        for module in self.modules() {
            for required_id in &module.unlock_criteria.required_module_ids {
                let required = self.module(required_id).ok().map(|m| m.difficulty);
                if required.map_or(true, |tier| tier >= module.difficulty) {
                    return Err(ConfigurationError::InvalidUnlockReference {
                        module_id: module.id.clone(),
                        difficulty: module.difficulty,
                        required_id: required_id.clone(),
                        required,
                    });
                }
            }
        }

        for section in &self.sections {
            if let Some(criteria) = &section.unlock_criteria {
                for required in &criteria.section_ids {
                    if required == &section.id {
                        return Err(ConfigurationError::InvalidContent(format!(
                            "section '{}' cannot require itself",
                            section.id
                        )));
                    }
                    self.section(required)?;
                }
            }
        }

        Ok(())
    }

    fn validate_capture_patterns(&self) -> Result<(), ConfigurationError> {
        for module in self.modules() {
            for scenario in &module.scenarios {
                if let ScenarioKind::DataCapture { capture } = &scenario.kind {
                    capture.regex()?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(id: &str, difficulty: Difficulty, requires: &[&str]) -> Module {
        Module {
            id: id.to_string(),
            title: id.to_string(),
            description: String::new(),
            difficulty,
            required_score: 70,
            unlock_criteria: UnlockCriteria {
                required_module_ids: requires.iter().map(|id| id.to_string()).collect(),
                required_score: 70,
            },
            scenarios: Vec::new(),
        }
    }

    fn section(id: &str, modules: Vec<Module>) -> Section {
        Section {
            id: id.to_string(),
            title: id.to_string(),
            description: String::new(),
            required_score: 70,
            completion_phrases: Vec::new(),
            unlock_criteria: None,
            modules,
        }
    }

    #[test]
    fn standard_catalog_loads_ten_sections_with_three_tiers() {
        let catalog = Catalog::standard().expect("standard catalog is valid");
        assert_eq!(catalog.sections().len(), 10);
        for tier in Difficulty::ALL {
            assert_eq!(catalog.modules_by_difficulty(tier).len(), 10, "{tier:?}");
        }
        let intake = catalog.module("intake-beginner").expect("intake module");
        assert_eq!(intake.required_score, 70);
        assert_eq!(
            catalog.section_of("application-advanced").expect("section").id,
            "application"
        );
    }

    #[test]
    fn rejects_prerequisites_in_same_or_higher_tier() {
        let sections = vec![section(
            "intake",
            vec![
                module("intake-beginner", Difficulty::Beginner, &["intake-intermediate"]),
                module("intake-intermediate", Difficulty::Intermediate, &[]),
            ],
        )];

        match Catalog::new(sections) {
            Err(ConfigurationError::InvalidUnlockReference {
                module_id,
                required,
                ..
            }) => {
                assert_eq!(module_id, "intake-beginner");
                assert_eq!(required, Some(Difficulty::Intermediate));
            }
            other => panic!("expected invalid unlock reference, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_prerequisite_and_duplicate_ids() {
        let missing = vec![section(
            "intake",
            vec![module("intake-intermediate", Difficulty::Intermediate, &["ghost"])],
        )];
        assert!(matches!(
            Catalog::new(missing),
            Err(ConfigurationError::InvalidUnlockReference { required: None, .. })
        ));

        let duplicate = vec![section(
            "intake",
            vec![
                module("intake-beginner", Difficulty::Beginner, &[]),
                module("intake-beginner", Difficulty::Beginner, &[]),
            ],
        )];
        assert_eq!(
            Catalog::new(duplicate).unwrap_err(),
            ConfigurationError::DuplicateModule("intake-beginner".to_string())
        );
    }

    #[test]
    fn lookups_name_the_missing_item() {
        let catalog = Catalog::standard().expect("standard catalog");
        assert_eq!(
            catalog.module("nope").unwrap_err(),
            ConfigurationError::UnknownModule("nope".to_string())
        );
        assert!(matches!(
            catalog.scenario("intake-beginner", 99),
            Err(ConfigurationError::UnknownScenario { index: 99, .. })
        ));
    }

    #[test]
    fn capture_patterns_are_compiled_once_at_load() {
        let catalog = Catalog::standard().expect("standard catalog");
        let capture = match &catalog.scenario("intake-beginner", 3).expect("scenario").kind {
            ScenarioKind::DataCapture { capture } => capture,
            other => panic!("expected a data capture scenario, got {other:?}"),
        };
        assert!(capture.compiled.get().is_some());

        let first: *const regex::Regex = capture.regex().expect("compiles");
        let again: *const regex::Regex = capture.regex().expect("compiles");
        assert_eq!(first, again);
    }

    #[test]
    fn emotional_context_only_on_conversational_scenarios() {
        let catalog = Catalog::standard().expect("standard catalog");
        let greeting = catalog.scenario("intake-beginner", 0).expect("scenario");
        assert_eq!(
            greeting.emotional_context().map(|context| context.mood.as_str()),
            Some("neutral")
        );

        let capture = catalog.scenario("intake-beginner", 3).expect("scenario");
        assert!(capture.emotional_context().is_none());
    }

    #[test]
    fn malformed_json_is_a_content_error() {
        assert!(matches!(
            Catalog::from_json("{\"sections\": 4}"),
            Err(ConfigurationError::InvalidContent(_))
        ));
    }
}
