//! HttpSenderFactory - DeliveryConfig の endpoint に record を POST する sender
//!
//! - `json`: record の JSON 配列を 1 リクエストで送る
//! - `json_lines`: 1 行 1 record（application/x-ndjson）
//!
//! 2xx 以外の応答は Delivery エラーとして扱います。

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url, header};
use serde::Serialize;

use crate::domain::{
    Build, Credentials, DeliveryConfig, PayloadFormat, PendingNotification, ResendError,
};
use crate::ports::{NotificationSender, SenderFactory};

#[derive(Debug, Clone, Default)]
pub struct HttpSenderFactory {
    client: Client,
}

impl HttpSenderFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl SenderFactory for HttpSenderFactory {
    fn create(&self, config: &DeliveryConfig) -> Result<Box<dyn NotificationSender>, ResendError> {
        config.validate()?;
        let url = Url::parse(&config.endpoint)
            .map_err(|e| ResendError::InvalidConfig(format!("endpoint {}: {e}", config.endpoint)))?;
        Ok(Box::new(HttpSender {
            client: self.client.clone(),
            url,
            credentials: config.credentials.clone(),
            format: config.format,
            timeout: config.timeout_secs.map(Duration::from_secs),
        }))
    }
}

#[derive(Debug, Serialize)]
struct NotificationPayload<'a> {
    project: &'a str,
    build: u64,
    module: &'a str,
    version: &'a str,
}

impl<'a> From<&'a PendingNotification> for NotificationPayload<'a> {
    fn from(record: &'a PendingNotification) -> Self {
        Self {
            project: record.build.project.name(),
            build: record.build.number,
            module: &record.module,
            version: &record.version,
        }
    }
}

/// Encodes `records` for the given format, returning the content type and body.
fn encode_body(
    format: PayloadFormat,
    records: &[PendingNotification],
) -> Result<(&'static str, Vec<u8>), ResendError> {
    let payloads: Vec<NotificationPayload<'_>> = records.iter().map(Into::into).collect();
    match format {
        PayloadFormat::Json => Ok(("application/json", serde_json::to_vec(&payloads)?)),
        PayloadFormat::JsonLines => {
            let mut body = Vec::new();
            for payload in &payloads {
                serde_json::to_writer(&mut body, payload)?;
                body.push(b'\n');
            }
            Ok(("application/x-ndjson", body))
        }
    }
}

struct HttpSender {
    client: Client,
    url: Url,
    credentials: Option<Credentials>,
    format: PayloadFormat,
    timeout: Option<Duration>,
}

#[async_trait]
impl NotificationSender for HttpSender {
    async fn send(&self, build: &Build, records: &[PendingNotification]) -> Result<(), ResendError> {
        let (content_type, body) = encode_body(self.format, records)?;

        let mut request = self
            .client
            .post(self.url.clone())
            .header(header::CONTENT_TYPE, content_type)
            .body(body);
        if let Some(credentials) = &self.credentials {
            request = request.basic_auth(&credentials.username, Some(&credentials.password));
        }
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ResendError::Delivery(format!(
                "{} answered {status} for build {build}",
                self.url
            )));
        }
        tracing::debug!(build = %build, records = records.len(), url = %self.url, "notifications delivered");
        Ok(())
    }
}
