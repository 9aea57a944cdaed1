use metrics_exporter_prometheus::PrometheusHandle;
use sales_trainer::config::TrainingConfig;
use sales_trainer::error::AppError;
use sales_trainer::training::{
    Catalog, ModuleProgress, ObjectionGame, ProgressRepository, RepositoryError, TraineeId,
    TrainingService,
};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Progress store that lives as long as the process. Each trainee's list is replaced whole on
/// save, so the last write wins.
#[derive(Default, Clone)]
pub(crate) struct InMemoryProgressRepository {
    records: Arc<Mutex<HashMap<TraineeId, Vec<ModuleProgress>>>>,
}

impl ProgressRepository for InMemoryProgressRepository {
    fn load(&self, trainee: &TraineeId) -> Result<Vec<ModuleProgress>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("progress store poisoned".to_string()))?;
        Ok(guard.get(trainee).cloned().unwrap_or_default())
    }

    fn save(&self, trainee: &TraineeId, progress: Vec<ModuleProgress>) -> Result<(), RepositoryError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("progress store poisoned".to_string()))?;
        guard.insert(trainee.clone(), progress);
        Ok(())
    }
}

impl InMemoryProgressRepository {
    /// Seeds a trainee's progress, replacing anything already stored.
    pub(crate) fn with_progress(self, trainee: TraineeId, progress: Vec<ModuleProgress>) -> Self {
        if let Ok(mut guard) = self.records.lock() {
            guard.insert(trainee, progress);
        }
        self
    }
}

/// Wires the standard content and the configured thresholds into a service.
pub(crate) fn training_service(
    config: &TrainingConfig,
    repository: InMemoryProgressRepository,
) -> Result<TrainingService<InMemoryProgressRepository>, AppError> {
    let catalog = Catalog::standard()?;
    let game = ObjectionGame::standard(config.game_rules());
    Ok(TrainingService::new(
        Arc::new(catalog),
        Arc::new(game),
        Arc::new(repository),
        config.unlock_policy(),
    ))
}

/// Reads a JSON array of module progress records, as exported by the progress endpoint.
pub(crate) fn load_progress_file(path: &Path) -> Result<Vec<ModuleProgress>, AppError> {
    let raw = std::fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|err| AppError::Io(err.into()))
}
