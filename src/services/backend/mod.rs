pub mod http;

use async_trait::async_trait;
use serde_json::Value;

/// The remote conversational backend. One call per submitted turn; the
/// response shape is deliberately left untyped because the backend does not
/// guarantee one (see the resolver).
#[async_trait]
pub trait AssistantBackend: Send + Sync {
    async fn execute(&self, patient_id: i64, text: &str) -> anyhow::Result<Value>;
}
