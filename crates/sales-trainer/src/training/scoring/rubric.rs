use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Weighted categories keyed by name. Scenarios may add categories of their own
/// (`trustBuilding`, `securityAssurance`, ...) next to the base three.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoringRubric {
    categories: BTreeMap<String, Category>,
}

impl ScoringRubric {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tonality / phrasing / empathy defaults shared by most scripted scenarios.
    pub fn standard() -> Self {
        Self::new()
            .with_category(
                "tonality",
                Category::new(
                    30.0,
                    &["understand", "help you", "find the best"],
                    &["have to", "must", "required"],
                ),
            )
            .with_category(
                "phrasing",
                Category::new(
                    40.0,
                    &["explain", "options", "coverage"],
                    &["policy", "rules", "requirement"],
                ),
            )
            .with_category(
                "empathy",
                Category::new(
                    30.0,
                    &["appreciate", "understand", "help"],
                    &["policy", "rules", "must"],
                ),
            )
    }

    pub fn with_category(mut self, name: impl Into<String>, category: Category) -> Self {
        self.categories.insert(name.into(), category);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, category: Category) -> Option<Category> {
        self.categories.insert(name.into(), category)
    }

    pub fn get(&self, name: &str) -> Option<&Category> {
        self.categories.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Category)> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn total_weight(&self) -> f64 {
        self.categories.values().map(|category| category.weight).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Relative importance, 0-100.
    pub weight: f64,
    #[serde(default)]
    pub key_phrases: Vec<String>,
    #[serde(default)]
    pub forbidden_phrases: Vec<String>,
}

impl Category {
    pub fn new(weight: f64, key_phrases: &[&str], forbidden_phrases: &[&str]) -> Self {
        Self {
            weight,
            key_phrases: key_phrases.iter().map(|p| p.to_string()).collect(),
            forbidden_phrases: forbidden_phrases.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Phrase worth a fixed number of points when used in an objection response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPhrase {
    pub phrase: String,
    pub points: i32,
}

/// Rubric for the objection mini-game. Unlike [`ScoringRubric`] it produces flat integer points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectionRubric {
    pub approved_phrases: Vec<String>,
    pub forbidden_phrases: Vec<String>,
    /// Ordered so feedback can suggest the first entries.
    pub key_phrases: Vec<KeyPhrase>,
    #[serde(default)]
    pub sample_rebuttals: Vec<String>,
    #[serde(default = "default_multiplier")]
    pub multi_phrase_multiplier: f64,
}

fn default_multiplier() -> f64 {
    1.0
}

impl ObjectionRubric {
    /// Multiplier applied when more than one distinct approved phrase lands. Values below 1.0
    /// (or non-finite) fall back to 1.0 so extra approved phrases never cost points.
    pub fn effective_multiplier(&self) -> f64 {
        if self.multi_phrase_multiplier.is_finite() && self.multi_phrase_multiplier >= 1.0 {
            self.multi_phrase_multiplier
        } else {
            1.0
        }
    }
}
