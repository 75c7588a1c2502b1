use crate::calendar::Period;
use crate::store::Store;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared handler state: the immutable period table and the store.
#[derive(Clone)]
pub struct AppState {
    pub periods: Arc<Vec<Period>>,
    pub store: Arc<Mutex<Store>>,
}

impl AppState {
    pub fn new(periods: Vec<Period>, store: Store) -> Self {
        Self {
            periods: Arc::new(periods),
            store: Arc::new(Mutex::new(store)),
        }
    }
}
