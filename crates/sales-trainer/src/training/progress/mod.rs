//! Per-trainee module progress and the tier/module/section unlock rules built on it.
//!
//! Everything here is a pure function over a progress slice; persistence goes through
//! [`ProgressRepository`] at the service layer.

mod record;
mod repository;
mod unlock;

pub use record::{record_attempt, ModuleProgress};
pub use repository::{ProgressRepository, RepositoryError, TraineeId};
pub use unlock::{
    can_unlock, module_accessible, module_status, section_unlocked, tier_completion,
    unlocked_tiers, LockReason, ModuleAccess, ModuleStatus, UnlockPolicy,
};
