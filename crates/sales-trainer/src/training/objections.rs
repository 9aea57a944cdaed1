//! Objection content for the mini-game: scripted prospect lines, tips, and scoring rubrics.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::ConfigurationError;
use super::scoring::{KeyPhrase, ObjectionRubric};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObjectionType {
    Price,
    Trust,
    NotInterested,
    SendInfo,
    CallBack,
    AgeConcern,
    SpouseConsult,
    ExistingCoverage,
    Affordability,
    WorkingWithAgent,
    WontPay,
    ChildrenCare,
}

impl ObjectionType {
    pub const ALL: [ObjectionType; 12] = [
        ObjectionType::Price,
        ObjectionType::Trust,
        ObjectionType::NotInterested,
        ObjectionType::SendInfo,
        ObjectionType::CallBack,
        ObjectionType::AgeConcern,
        ObjectionType::SpouseConsult,
        ObjectionType::ExistingCoverage,
        ObjectionType::Affordability,
        ObjectionType::WorkingWithAgent,
        ObjectionType::WontPay,
        ObjectionType::ChildrenCare,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ObjectionType::Price => "PRICE",
            ObjectionType::Trust => "TRUST",
            ObjectionType::NotInterested => "NOT_INTERESTED",
            ObjectionType::SendInfo => "SEND_INFO",
            ObjectionType::CallBack => "CALL_BACK",
            ObjectionType::AgeConcern => "AGE_CONCERN",
            ObjectionType::SpouseConsult => "SPOUSE_CONSULT",
            ObjectionType::ExistingCoverage => "EXISTING_COVERAGE",
            ObjectionType::Affordability => "AFFORDABILITY",
            ObjectionType::WorkingWithAgent => "WORKING_WITH_AGENT",
            ObjectionType::WontPay => "WONT_PAY",
            ObjectionType::ChildrenCare => "CHILDREN_CARE",
        }
    }

    /// Category used for badge and level-gate counting.
    pub const fn category(self) -> ObjectionCategory {
        match self {
            ObjectionType::Price | ObjectionType::Affordability => ObjectionCategory::Price,
            ObjectionType::Trust | ObjectionType::WontPay => ObjectionCategory::Trust,
            ObjectionType::SendInfo | ObjectionType::CallBack => ObjectionCategory::Timing,
            ObjectionType::NotInterested
            | ObjectionType::AgeConcern
            | ObjectionType::ExistingCoverage => ObjectionCategory::Need,
            ObjectionType::SpouseConsult | ObjectionType::ChildrenCare => {
                ObjectionCategory::Family
            }
            ObjectionType::WorkingWithAgent => ObjectionCategory::Competition,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let wanted = value.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        Self::ALL.into_iter().find(|kind| kind.label() == wanted)
    }
}

impl fmt::Display for ObjectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObjectionCategory {
    Price,
    Trust,
    Timing,
    Need,
    Family,
    Competition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObjectionDifficulty {
    Easy,
    Moderate,
    Difficult,
}

/// Prospect-facing content for one objection type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectionProfile {
    pub difficulty: ObjectionDifficulty,
    pub scenarios: Vec<String>,
    pub tips: String,
}

/// Profiles and rubrics keyed by objection type. Rubrics are held apart from profiles so a
/// content gap surfaces as [`ConfigurationError::MissingObjectionRubric`].
#[derive(Debug, Clone, Default)]
pub struct ObjectionCatalog {
    profiles: BTreeMap<ObjectionType, ObjectionProfile>,
    rubrics: BTreeMap<ObjectionType, ObjectionRubric>,
}

impl ObjectionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_objection(
        mut self,
        kind: ObjectionType,
        profile: ObjectionProfile,
        rubric: ObjectionRubric,
    ) -> Self {
        self.profiles.insert(kind, profile);
        self.rubrics.insert(kind, rubric);
        self
    }

    pub fn with_profile(mut self, kind: ObjectionType, profile: ObjectionProfile) -> Self {
        self.profiles.insert(kind, profile);
        self
    }

    pub fn profile(&self, kind: ObjectionType) -> Result<&ObjectionProfile, ConfigurationError> {
        self.profiles
            .get(&kind)
            .ok_or(ConfigurationError::MissingObjectionScenarios(kind))
    }

    pub fn rubric(&self, kind: ObjectionType) -> Result<&ObjectionRubric, ConfigurationError> {
        self.rubrics
            .get(&kind)
            .ok_or(ConfigurationError::MissingObjectionRubric(kind))
    }

    pub fn standard() -> Self {
        standard_objections()
            .into_iter()
            .fold(Self::new(), |catalog, (kind, profile, rubric)| {
                catalog.with_objection(kind, profile, rubric)
            })
    }
}

fn lines(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn keys(values: &[(&str, i32)]) -> Vec<KeyPhrase> {
    values
        .iter()
        .map(|(phrase, points)| KeyPhrase {
            phrase: phrase.to_string(),
            points: *points,
        })
        .collect()
}

fn entry(
    kind: ObjectionType,
    difficulty: ObjectionDifficulty,
    scenarios: &[&str],
    tips: &str,
    approved: &[&str],
    forbidden: &[&str],
    key_phrases: &[(&str, i32)],
    rebuttals: &[&str],
) -> (ObjectionType, ObjectionProfile, ObjectionRubric) {
    (
        kind,
        ObjectionProfile {
            difficulty,
            scenarios: lines(scenarios),
            tips: tips.to_string(),
        },
        ObjectionRubric {
            approved_phrases: lines(approved),
            forbidden_phrases: lines(forbidden),
            key_phrases: keys(key_phrases),
            sample_rebuttals: lines(rebuttals),
            multi_phrase_multiplier: 1.0,
        },
    )
}

fn standard_objections() -> Vec<(ObjectionType, ObjectionProfile, ObjectionRubric)> {
    use ObjectionDifficulty::{Difficult, Easy, Moderate};

    vec![
        entry(
            ObjectionType::Price,
            Easy,
            &[
                "That sounds expensive",
                "How much is this going to cost me?",
                "I don't want to pay a lot for this",
            ],
            "Lead with value, then show how the monthly amount fits the budget",
            &[
                "let me share how we make this affordable",
                "fits your budget",
                "less than a dollar a day",
            ],
            &["cheap", "you can't afford", "it's not that much"],
            &[("monthly payments", 25), ("budget", 20), ("value", 15)],
            &["I hear you. Let me share how we make this affordable, most of our clients pay less than a dollar a day."],
        ),
        entry(
            ObjectionType::Trust,
            Moderate,
            &[
                "How do I know you're legitimate?",
                "I don't give my information to people on the phone",
                "This sounds like a scam",
            ],
            "Offer verifiable credentials and let the prospect set the pace",
            &[
                "you can verify my license",
                "licensed in your state",
                "take your time",
            ],
            &["trust me", "just give me", "calm down"],
            &[("license", 25), ("verify", 20), ("reviews", 15)],
            &["That's a fair question. You can verify my license with the state before we go any further."],
        ),
        entry(
            ObjectionType::NotInterested,
            Easy,
            &[
                "I don't see the value in this",
                "What makes this worth the money?",
                "I'm not sure this is worth the investment",
            ],
            "Highlight benefits, demonstrate ROI, share success stories",
            &[
                "what matters most to you",
                "peace of mind",
                "many of my clients felt the same way",
            ],
            &["you're wrong", "everyone needs this", "obviously"],
            &[("benefits", 20), ("family", 20), ("protect", 25)],
            &["Many of my clients felt the same way until they saw what it would mean for their family."],
        ),
        entry(
            ObjectionType::SendInfo,
            Easy,
            &[
                "Just send me some information",
                "Can you mail me a brochure?",
                "Email me the details and I'll look later",
            ],
            "Agree, then secure a short review call while interest is high",
            &[
                "walk through it together",
                "happy to send that",
                "only takes a few minutes",
            ],
            &["i can't do that", "that's a waste of time", "just look it up"],
            &[("today", 20), ("rates", 20), ("few minutes", 15)],
            &["Happy to send that. It only takes a few minutes to walk through it together so it makes sense when it arrives."],
        ),
        entry(
            ObjectionType::CallBack,
            Easy,
            &[
                "I want to think about it",
                "Call me back next month",
                "I'm not ready to make a decision today",
            ],
            "Create urgency, discuss rate increases, share stories of procrastination consequences",
            &[
                "rates go up with age",
                "lock in your rate",
                "what would you need to feel ready",
            ],
            &["now or never", "you'll regret it", "stop stalling"],
            &[("rate increase", 25), ("birthday", 15), ("today", 20)],
            &["I understand. Keep in mind rates go up with age, so locking in your rate today protects you from the next increase."],
        ),
        entry(
            ObjectionType::AgeConcern,
            Easy,
            &[
                "I'm not sure this is right for me",
                "I'm too old for this",
                "I'm not ready to think about this now",
            ],
            "Emphasize the benefits of early planning, discuss age-appropriate options",
            &[
                "designed for your age group",
                "guaranteed acceptance",
                "no medical exam",
            ],
            &["at your age", "too old", "before it's too late"],
            &[("options", 20), ("planning", 20), ("guaranteed", 25)],
            &["These plans are designed for your age group, with guaranteed acceptance and no medical exam."],
        ),
        entry(
            ObjectionType::SpouseConsult,
            Moderate,
            &[
                "I need to talk to my spouse before making any decisions",
                "My children handle all my financial decisions",
                "Let me discuss this with my family first",
            ],
            "Emphasize urgency, offer to include family in conversation, discuss rate increases",
            &[
                "include them on the call",
                "decide together",
                "what questions do you think they'll have",
            ],
            &["they don't need to know", "you can decide alone", "don't ask them"],
            &[("together", 20), ("family", 20), ("three-way call", 25)],
            &["That makes sense. Would it help to include them on the call so you can decide together?"],
        ),
        entry(
            ObjectionType::ExistingCoverage,
            Moderate,
            &[
                "I already have life insurance through my old job",
                "I have a small policy with AARP",
                "Social Security will cover my funeral",
            ],
            "Explain coverage gaps, discuss benefit amounts, highlight guaranteed acceptance",
            &[
                "review what you have",
                "fill the gap",
                "make sure it's enough",
            ],
            &["your policy is bad", "cancel it", "that's worthless"],
            &[("coverage gap", 25), ("benefit amount", 20), ("funeral costs", 15)],
            &["Great, let's review what you have and make sure it's enough to cover today's funeral costs."],
        ),
        entry(
            ObjectionType::Affordability,
            Moderate,
            &[
                "That's way too expensive for me, I'm on a fixed income",
                "I can't afford another bill right now",
                "The other company offered me something cheaper",
            ],
            "Focus on value over price, monthly payment flexibility, and protecting family",
            &[
                "let me share how we make this affordable",
                "adjust the coverage amount",
                "protect your family",
            ],
            &["cheap", "you can't afford", "just cut back"],
            &[("monthly payments", 25), ("fixed income", 20), ("value", 15)],
            &["I understand you're on a fixed income. Let me share how we make this affordable by adjusting the coverage amount."],
        ),
        entry(
            ObjectionType::WorkingWithAgent,
            Difficult,
            &[
                "I'm already working with another agent",
                "Someone else is handling my insurance",
                "I have an agent I trust",
            ],
            "Build value, focus on unique benefits, acknowledge loyalty concerns",
            &[
                "i respect that relationship",
                "second opinion",
                "compare side by side",
            ],
            &["your agent is wrong", "they're ripping you off", "forget them"],
            &[("compare", 20), ("unique benefits", 25), ("loyalty", 15)],
            &["I respect that relationship. A second opinion lets you compare side by side at no cost."],
        ),
        entry(
            ObjectionType::WontPay,
            Difficult,
            &[
                "Insurance companies never pay claims",
                "I've heard these companies are all scams",
                "They'll find any reason not to pay",
            ],
            "Share company history, claims statistics, state regulations",
            &[
                "claims paid within",
                "regulated by the state",
                "a-rated carrier",
            ],
            &["that never happens", "you're paranoid", "trust me"],
            &[("claims", 20), ("history", 15), ("regulated", 25)],
            &["That's a real concern. We're an A-rated carrier regulated by the state, with claims paid within days."],
        ),
        entry(
            ObjectionType::ChildrenCare,
            Difficult,
            &[
                "I'm concerned about leaving my children without financial support",
                "I'm not sure my children are ready for this",
                "I'm not sure this is the best use of my money",
            ],
            "Emphasize the importance of financial security, discuss age-appropriate planning",
            &[
                "financial security for your children",
                "leave a legacy",
                "one less burden",
            ],
            &["they'll be fine", "not your problem", "whatever"],
            &[("security", 20), ("legacy", 20), ("children", 15)],
            &["That's exactly why this matters. It gives financial security for your children and one less burden for them to carry."],
        ),
    ]
}
