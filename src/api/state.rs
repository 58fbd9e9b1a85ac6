use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::application::{QaService, SessionBootstrap, SessionState};
use crate::infrastructure::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub bootstrap: Arc<dyn SessionBootstrap>,
    pub qa: Arc<QaService>,
    pub sessions: SessionRegistry,
}

impl AppState {
    pub fn new(
        config: Arc<AppConfig>,
        bootstrap: Arc<dyn SessionBootstrap>,
        qa: Arc<QaService>,
    ) -> Self {
        Self {
            config,
            bootstrap,
            qa,
            sessions: SessionRegistry::default(),
        }
    }
}

/// Live sessions by id. Each session sits behind its own mutex so one
/// session handles a single interaction at a time while others proceed.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    inner: Arc<RwLock<HashMap<Uuid, Arc<Mutex<SessionState>>>>>,
}

impl SessionRegistry {
    pub async fn insert(&self, session: SessionState) -> Arc<Mutex<SessionState>> {
        let id = session.id();
        let session = Arc::new(Mutex::new(session));
        self.inner.write().await.insert(id, session.clone());
        session
    }

    pub async fn get(&self, id: &Uuid) -> Option<Arc<Mutex<SessionState>>> {
        self.inner.read().await.get(id).cloned()
    }

    pub async fn remove(&self, id: &Uuid) -> bool {
        self.inner.write().await.remove(id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}
