//! Async façade over the analysis manager
//!
//! Callers on a tokio runtime share one [`AnalysisService`] per model. Solves
//! run on the blocking pool behind an async mutex, so at most one is in flight
//! and the snapshot cannot change underneath it.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::analysis::AnalysisOptions;
use crate::error::{FrameError, FrameResult};
use crate::manager::{AnalysisManager, CancelToken, CaseStatus};
use crate::model::ModelSnapshot;
use crate::results::{AnalysisResult, AnalysisStatus, ResultsCache};

#[derive(Debug, Clone)]
pub struct AnalysisService {
    manager: Arc<Mutex<AnalysisManager>>,
    cancel: CancelToken,
}

impl AnalysisService {
    pub fn new(model: ModelSnapshot, options: AnalysisOptions) -> Self {
        let manager = AnalysisManager::with_options(model, options);
        let cancel = manager.cancel_token();
        Self {
            manager: Arc::new(Mutex::new(manager)),
            cancel,
        }
    }

    /// Run `f` on the manager from the blocking pool
    async fn with_manager<T, F>(&self, f: F) -> FrameResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut AnalysisManager) -> FrameResult<T> + Send + 'static,
    {
        let mut guard = self.manager.clone().lock_owned().await;
        tokio::task::spawn_blocking(move || f(&mut guard))
            .await
            .map_err(|e| FrameError::AnalysisFailed(format!("analysis task failed: {}", e)))?
    }

    /// Solve every case, then every combination
    pub async fn run_analysis(&self) -> FrameResult<AnalysisStatus> {
        self.with_manager(|manager| manager.run_analysis()).await
    }

    pub async fn run_case(&self, name: &str) -> FrameResult<AnalysisResult> {
        let name = name.to_string();
        self.with_manager(move |manager| manager.run_case(&name).cloned()).await
    }

    pub async fn run_combination(&self, name: &str) -> FrameResult<AnalysisResult> {
        let name = name.to_string();
        self.with_manager(move |manager| manager.run_combination(&name).cloned())
            .await
    }

    /// Swap the model; waits for any running solve to finish first
    pub async fn replace_model(&self, model: ModelSnapshot) {
        self.manager.lock().await.replace_model(model);
    }

    pub async fn result(&self, name: &str) -> Option<AnalysisResult> {
        self.manager.lock().await.result(name).cloned()
    }

    pub async fn case_status(&self, name: &str) -> CaseStatus {
        self.manager.lock().await.case_status(name)
    }

    pub async fn failures(&self) -> BTreeMap<String, String> {
        self.manager.lock().await.failures()
    }

    /// Copy of the results cache
    pub async fn cache(&self) -> ResultsCache {
        self.manager.lock().await.cache().clone()
    }

    pub async fn is_ready(&self) -> bool {
        self.manager.lock().await.is_ready()
    }

    /// Stop the running batch after its current case
    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}
