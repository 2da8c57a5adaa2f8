use std::collections::HashMap;
use std::sync::Mutex;

use crate::config::AppConfig;
use crate::services::backend::AssistantBackend;
use crate::services::conversation::Conversation;

pub struct AppState {
    pub sessions: Mutex<HashMap<i64, Conversation>>,
    pub config: AppConfig,
    pub backend: Box<dyn AssistantBackend>,
}
