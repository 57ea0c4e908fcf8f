use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::CoreError;

/// Minimal typed HTTP wrapper: one request per call against
/// `base_url + path`, JSON in, JSON (or plain text for DELETE) out.
///
/// Failure is normalized into a small set of kinds: any non-2xx status is
/// `RequestFailed { status, path }`, a transport failure is
/// `NetworkUnreachable`, and a body that fails to decode is
/// `Deserialization`. There is no retry, no backoff, and no caching at
/// this layer — retry policy belongs entirely to the caller (the polling
/// synchronizer supplies it by fixed-interval re-invocation).
///
/// No request timeout is configured: a hung request delays only the tick
/// that issued it.
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: base_url.into(),
        }
    }

    /// Resolve a request path against the configured base URL.
    ///
    /// An empty base is a configuration error surfaced here, on first use,
    /// rather than validated eagerly at construction.
    pub fn url(&self, path: &str) -> Result<String, CoreError> {
        if self.base_url.is_empty() {
            return Err(CoreError::Config("API base URL is not configured".into()));
        }
        Ok(format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        ))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, CoreError> {
        let url = self.url(path)?;
        let res = self.client.get(&url).send().await?;
        let res = ensure_success(res, path)?;
        decode_json(res, path).await
    }

    /// POST with a JSON body. A 2xx response with an empty body is legal
    /// and yields `None`.
    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<Option<T>, CoreError> {
        let url = self.url(path)?;
        let res = self.client.post(&url).json(body).send().await?;
        let res = ensure_success(res, path)?;
        decode_optional_json(res, path).await
    }

    /// PUT with a JSON body; same empty-body tolerance as `post`.
    pub async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<Option<T>, CoreError> {
        let url = self.url(path)?;
        let res = self.client.put(&url).json(body).send().await?;
        let res = ensure_success(res, path)?;
        decode_optional_json(res, path).await
    }

    /// DELETE with an optional JSON body. The backend answers these with an
    /// empty or plain-text body, so the raw text is returned as-is.
    pub async fn delete(
        &self,
        path: &str,
        body: Option<&impl Serialize>,
    ) -> Result<String, CoreError> {
        let url = self.url(path)?;
        let mut req = self.client.delete(&url);
        if let Some(body) = body {
            req = req.json(body);
        }
        let res = req.send().await?;
        let res = ensure_success(res, path)?;
        Ok(res.text().await?)
    }
}

impl std::fmt::Debug for HttpGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGateway")
            .field("base_url", &self.base_url)
            .finish()
    }
}

fn ensure_success(res: Response, path: &str) -> Result<Response, CoreError> {
    let status = res.status();
    if !status.is_success() {
        return Err(CoreError::RequestFailed {
            status: status.as_u16(),
            path: path.to_string(),
        });
    }
    Ok(res)
}

async fn decode_json<T: DeserializeOwned>(res: Response, path: &str) -> Result<T, CoreError> {
    let bytes = res.bytes().await?;
    serde_json::from_slice(&bytes)
        .map_err(|e| CoreError::Deserialization(format!("{path}: {e}")))
}

async fn decode_optional_json<T: DeserializeOwned>(
    res: Response,
    path: &str,
) -> Result<Option<T>, CoreError> {
    let bytes = res.bytes().await?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|e| CoreError::Deserialization(format!("{path}: {e}")))
}
