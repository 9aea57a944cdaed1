use std::fmt;

use serde::{Deserialize, Serialize};

use super::state::GameState;
use crate::training::objections::ObjectionCategory;

/// Objections of one category a trainee must face before earning its badge.
pub const CATEGORY_BADGE_THRESHOLD: usize = 3;
/// Consecutive clean responses needed for `closingchamp`.
pub const CLOSING_STREAK: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Badge {
    Pricemaster,
    Trustbuilder,
    Closingchamp,
}

impl Badge {
    pub const ALL: [Badge; 3] = [Badge::Pricemaster, Badge::Trustbuilder, Badge::Closingchamp];

    pub const fn id(self) -> &'static str {
        match self {
            Badge::Pricemaster => "pricemaster",
            Badge::Trustbuilder => "trustbuilder",
            Badge::Closingchamp => "closingchamp",
        }
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badges {
    pub pricemaster: bool,
    pub trustbuilder: bool,
    pub closingchamp: bool,
}

impl Badges {
    pub fn has(&self, badge: Badge) -> bool {
        match badge {
            Badge::Pricemaster => self.pricemaster,
            Badge::Trustbuilder => self.trustbuilder,
            Badge::Closingchamp => self.closingchamp,
        }
    }

    pub fn earned(&self) -> Vec<Badge> {
        Badge::ALL.into_iter().filter(|badge| self.has(*badge)).collect()
    }

    fn award(&mut self, badge: Badge) {
        match badge {
            Badge::Pricemaster => self.pricemaster = true,
            Badge::Trustbuilder => self.trustbuilder = true,
            Badge::Closingchamp => self.closingchamp = true,
        }
    }
}

/// Badges the state qualifies for, merged with those already held. A badge once held is
/// never dropped.
pub fn evaluate(state: &GameState) -> Badges {
    let mut badges = state.badges;
    if state.category_count(ObjectionCategory::Price) >= CATEGORY_BADGE_THRESHOLD {
        badges.award(Badge::Pricemaster);
    }
    if state.category_count(ObjectionCategory::Trust) >= CATEGORY_BADGE_THRESHOLD {
        badges.award(Badge::Trustbuilder);
    }
    if state.consecutive_wins >= CLOSING_STREAK {
        badges.award(Badge::Closingchamp);
    }
    badges
}

/// Badges present in `after` but not in `before`.
pub fn newly_earned(before: &Badges, after: &Badges) -> Vec<Badge> {
    Badge::ALL
        .into_iter()
        .filter(|badge| after.has(*badge) && !before.has(*badge))
        .collect()
}
