use std::sync::Arc;

use crate::auth::JwtKeys;
use crate::store::EventStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EventStore>,
    pub jwt: Arc<JwtKeys>,
}

impl AppState {
    pub fn new(store: Arc<dyn EventStore>, jwt: JwtKeys) -> Self {
        Self {
            store,
            jwt: Arc::new(jwt),
        }
    }
}
