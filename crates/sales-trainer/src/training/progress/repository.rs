use serde::{Deserialize, Serialize};

use super::record::ModuleProgress;

/// Trainee identifier used as the persistence key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraineeId(pub String);

/// Storage for progress lists. The core never calls this; the service does, around the pure
/// progress functions.
pub trait ProgressRepository: Send + Sync {
    /// Progress for a trainee; empty when nothing has been saved yet.
    fn load(&self, trainee: &TraineeId) -> Result<Vec<ModuleProgress>, RepositoryError>;
    fn save(&self, trainee: &TraineeId, progress: Vec<ModuleProgress>)
        -> Result<(), RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
