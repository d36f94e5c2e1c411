use std::sync::Arc;

use crate::config::AppConfig;
use crate::contact_list::ContactListStore;

pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<dyn ContactListStore>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn ContactListStore>) -> Self {
        Self { config, store }
    }
}
