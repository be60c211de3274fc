//! HTTP/JSON client for the native backend
//!
//! Every backend command is reached with `POST {base_url}/invoke/{command}`
//! carrying a JSON object of camelCase arguments. Replies are plain JSON.

use std::time::Duration;

use idlerig_domain::BackendConfig;
use reqwest::{Client as ReqwestClient, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use super::errors::BackendError;

#[derive(Clone)]
pub struct BackendClient {
    http: ReqwestClient,
    base_url: Url,
    timeout: Duration,
}

impl BackendClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Config`] if the base URL does not parse or
    /// the HTTP client cannot be built.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let mut base_url = Url::parse(&config.base_url)
            .map_err(|e| BackendError::Config(format!("invalid backend url {}: {e}", config.base_url)))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let timeout = config.timeout();
        let http = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, base_url, timeout })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Invoke `command` with `args` and decode the reply.
    #[instrument(skip(self, args), fields(command = %command))]
    pub async fn invoke<A, R>(&self, command: &str, args: &A) -> Result<R, BackendError>
    where
        A: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self
            .base_url
            .join(&format!("invoke/{command}"))
            .map_err(|e| BackendError::Config(format!("invalid command {command}: {e}")))?;

        debug!(%url, "invoking backend command");

        let request = self.http.post(url).json(args).send();
        let response = match tokio::time::timeout(self.timeout, request).await {
            Ok(Ok(response)) => response,
            Ok(Err(err)) if err.is_timeout() => return Err(BackendError::Timeout(self.timeout)),
            Ok(Err(err)) => return Err(err.into()),
            Err(_) => return Err(BackendError::Timeout(self.timeout)),
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "backend command failed");
            return Err(BackendError::from_status(status, command, &body));
        }

        if status == StatusCode::NO_CONTENT {
            return serde_json::from_value(Value::Null).map_err(|_| {
                BackendError::Decode(format!("{command} returned no content"))
            });
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return serde_json::from_value(Value::Null)
                .map_err(|_| BackendError::Decode(format!("{command} returned an empty body")));
        }
        serde_json::from_slice(&bytes)
            .map_err(|e| BackendError::Decode(format!("{command}: {e}")))
    }

    /// Invoke a command that takes no arguments.
    pub async fn invoke_no_args<R: DeserializeOwned>(&self, command: &str) -> Result<R, BackendError> {
        self.invoke(command, &serde_json::json!({})).await
    }
}
