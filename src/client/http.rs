use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::{Serialize, de::DeserializeOwned};

use crate::response::ApiResponse;

use super::{
    ClientConfig,
    error::{ClientError, ClientResult},
    store::{LocalStore, keys},
};

/// JSON client for the marketplace API. The bearer token is read from the
/// local store on every request, so a login elsewhere is picked up at once.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    store: LocalStore,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, store: LocalStore) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            store,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let mut request = self
            .client
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json");

        if let Some(token) = self.store.get::<String>(keys::TOKEN) {
            request = request.bearer_auth(token);
        }
        request
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.request(Method::GET, path).send().await?;
        Self::handle_response(response).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> ClientResult<T> {
        let response = self.request(Method::POST, path).json(body).send().await?;
        Self::handle_response(response).await
    }

    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.request(Method::POST, path).send().await?;
        Self::handle_response(response).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> ClientResult<T> {
        let response = self.request(Method::PUT, path).json(body).send().await?;
        Self::handle_response(response).await
    }

    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        let response = self.request(Method::DELETE, path).send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await?;
            return Err(Self::status_error(status, text));
        }
        Ok(())
    }

    /// Unwraps the `{message, data, meta}` envelope.
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(Self::status_error(status, text));
        }

        let envelope: ApiResponse<T> = serde_json::from_str(&text)?;
        envelope
            .data
            .ok_or_else(|| ClientError::InvalidResponse(format!("missing data: {}", envelope.message)))
    }

    fn status_error(status: StatusCode, body: String) -> ClientError {
        let message = serde_json::from_str::<ApiResponse<serde_json::Value>>(&body)
            .map(|envelope| envelope.message)
            .unwrap_or(body);

        match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
            StatusCode::FORBIDDEN => ClientError::Forbidden(message),
            StatusCode::NOT_FOUND => ClientError::NotFound(message),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                ClientError::Validation(message)
            }
            _ => ClientError::Internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_message_is_surfaced() {
        let body = r#"{"message":"Account is not active","data":{"error":"Account is not active"},"meta":null}"#;
        match ApiClient::status_error(StatusCode::FORBIDDEN, body.to_string()) {
            ClientError::Forbidden(msg) => assert_eq!(msg, "Account is not active"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn validation_statuses_map_to_validation() {
        let err = ApiClient::status_error(StatusCode::UNPROCESSABLE_ENTITY, "plain text".into());
        assert!(matches!(err, ClientError::Validation(msg) if msg == "plain text"));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path().join("store.json"));
        let client =
            ApiClient::new(&ClientConfig::new("http://localhost:3000/api/", "unused"), store).unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000/api");
    }
}
