// ============================================================
// SESSION REGISTRY
// ============================================================
// One ViewCoordinator per browser session over the shared dataset

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};

use lru::LruCache;
use tracing::{debug, info};
use uuid::Uuid;

use crate::application::{RenderedView, ViewCoordinator};
use crate::domain::dataset::Dataset;
use crate::domain::error::{AppError, Result};

type Sessions = LruCache<Uuid, Arc<Mutex<ViewCoordinator>>>;

/// Live sessions keyed by id. The dataset is shared read-only; each session
/// owns its own filter state and active view.
pub struct SessionRegistry {
    dataset: Arc<Dataset>,
    sessions: Mutex<Sessions>,
}

impl SessionRegistry {
    pub fn new(dataset: Arc<Dataset>, max_sessions: usize) -> Self {
        let capacity = NonZeroUsize::new(max_sessions).unwrap_or(NonZeroUsize::MIN);
        Self {
            dataset,
            sessions: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    /// Open a session on the default view, evicting the least recently used
    /// one when the registry is full
    pub fn create(&self) -> Result<(Uuid, RenderedView)> {
        let coordinator = ViewCoordinator::new(Arc::clone(&self.dataset));
        let view = coordinator.render()?;
        let id = Uuid::new_v4();

        let mut sessions = self.lock()?;
        if let Some((evicted, _)) = sessions.push(id, Arc::new(Mutex::new(coordinator))) {
            info!(session = %evicted, "Session evicted");
        }
        debug!(session = %id, live = sessions.len(), "Session created");

        Ok((id, view))
    }

    /// Run one interaction against a session. Interactions on the same
    /// session are serialized; other sessions are not blocked.
    pub fn with_session<T>(
        &self,
        id: Uuid,
        interaction: impl FnOnce(&mut ViewCoordinator) -> Result<T>,
    ) -> Result<T> {
        let coordinator = {
            let mut sessions = self.lock()?;
            let coordinator = sessions
                .get(&id)
                .ok_or_else(|| AppError::NotFound(format!("Session {}", id)))?;
            Arc::clone(coordinator)
        };

        let mut coordinator = coordinator
            .lock()
            .map_err(|_| AppError::Internal(format!("Session {} lock poisoned", id)))?;
        interaction(&mut *coordinator)
    }

    pub fn remove(&self, id: Uuid) -> Result<()> {
        self.lock()?
            .pop(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Session {}", id)))
    }

    pub fn len(&self) -> usize {
        self.lock().map(|sessions| sessions.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, Sessions>> {
        self.sessions
            .lock()
            .map_err(|_| AppError::Internal("Session registry lock poisoned".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dataset::fixtures::scenario_dataset;
    use crate::domain::filter_state::{ControlInput, ControlValue, FilterControl};

    fn registry(max_sessions: usize) -> SessionRegistry {
        SessionRegistry::new(Arc::new(scenario_dataset()), max_sessions)
    }

    #[test]
    fn test_sessions_are_independent() {
        let registry = registry(8);
        let (first, _) = registry.create().unwrap();
        let (second, _) = registry.create().unwrap();

        registry
            .with_session(first, |c| {
                c.set_control(FilterControl::Organism, ControlInput::Value("E.coli".to_string()))
            })
            .unwrap();

        let organism = registry
            .with_session(second, |c| Ok(c.state().organism.clone()))
            .unwrap();
        assert_eq!(organism, ControlValue::All);
    }

    #[test]
    fn test_least_recently_used_session_is_evicted() {
        let registry = registry(2);
        let (first, _) = registry.create().unwrap();
        let (second, _) = registry.create().unwrap();
        registry.with_session(first, |c| c.render()).unwrap();
        let (_third, _) = registry.create().unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.with_session(first, |c| c.render()).is_ok());
        assert!(matches!(
            registry.with_session(second, |c| c.render()),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_zero_capacity_keeps_one_session() {
        let registry = registry(0);
        let (_first, _) = registry.create().unwrap();
        let (second, _) = registry.create().unwrap();

        assert_eq!(registry.len(), 1);
        assert!(registry.with_session(second, |c| c.render()).is_ok());
    }

    #[test]
    fn test_remove_unknown_session_is_not_found() {
        let registry = registry(2);
        assert!(matches!(registry.remove(Uuid::new_v4()), Err(AppError::NotFound(_))));
    }
}
