use anyhow::Context;
use async_trait::async_trait;
use serde_json::{json, Value};

use super::AssistantBackend;

pub struct HttpBackend {
    url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(url: String) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl AssistantBackend for HttpBackend {
    async fn execute(&self, patient_id: i64, text: &str) -> anyhow::Result<Value> {
        let body = json!({
            "id_number": patient_id,
            "messages": text,
        });

        let resp = self
            .client
            .post(format!("{}/execute", self.url))
            .json(&body)
            .send()
            .await
            .context("failed to call assistant backend")?;

        anyhow::ensure!(
            resp.status().is_success(),
            "assistant backend returned status {}",
            resp.status()
        );

        resp.json()
            .await
            .context("failed to parse assistant backend response")
    }
}
