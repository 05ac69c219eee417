use crate::models::Node;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApiErrorKind {
    Network,
    Http,
    Parse,
}

#[derive(Clone, Debug, Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl ApiError {
    fn network(e: reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            message: e.to_string(),
        }
    }

    fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            message: e.to_string(),
        }
    }

    fn http(status: reqwest::StatusCode, body: &str, ctx: &str) -> Self {
        Self {
            kind: ApiErrorKind::Http,
            message: format!("{ctx} ({status}): {body}"),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

pub const CSRF_HEADER: &str = "X-CSRFToken";

#[derive(Serialize, Clone, Debug)]
pub struct SaveMetadataRequest<'a> {
    pub metadata: &'a Node,
    pub file_name: String,
    pub overwrite: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SaveMetadataResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

impl SaveMetadataResponse {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct DeleteFileRequest {
    pub file_name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct DeleteFileResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

/// Client for the server views that store and delete metadata documents.
#[derive(Clone, Debug)]
pub struct PersistenceClient {
    pub(crate) save_url: String,
    pub(crate) delete_url: String,
    pub(crate) csrf_token: Option<String>,
}

impl PersistenceClient {
    pub fn new(save_url: String, delete_url: String, csrf_token: Option<String>) -> Self {
        Self {
            save_url,
            delete_url,
            csrf_token,
        }
    }

    fn with_csrf_header(
        mut req: reqwest::RequestBuilder,
        token: Option<&str>,
    ) -> reqwest::RequestBuilder {
        if let Some(token) = token {
            req = req.header(CSRF_HEADER, token);
        }
        req
    }

    async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        body: &impl Serialize,
    ) -> ApiResult<T> {
        log::debug!("api::post_json {}", url);

        let client = reqwest::Client::new();
        let req = Self::with_csrf_header(client.post(url), self.csrf_token.as_deref());
        let res = req.json(body).send().await.map_err(ApiError::network)?;

        // The endpoint reports application errors in the JSON body, so the
        // body is read whatever the status.
        let status = res.status();
        let text = res.text().await.map_err(ApiError::network)?;
        Self::parse_body(status, &text)
    }

    pub(crate) fn parse_body<T: serde::de::DeserializeOwned>(
        status: reqwest::StatusCode,
        text: &str,
    ) -> ApiResult<T> {
        match serde_json::from_str(text) {
            Ok(v) => Ok(v),
            Err(_) if !status.is_success() => Err(ApiError::http(status, text, "Request failed")),
            Err(e) => Err(ApiError::parse(e)),
        }
    }

    pub async fn save_metadata(
        &self,
        req: &SaveMetadataRequest<'_>,
    ) -> ApiResult<SaveMetadataResponse> {
        self.post_json(&self.save_url, req).await
    }

    pub async fn delete_file(&self, req: &DeleteFileRequest) -> ApiResult<DeleteFileResponse> {
        self.post_json(&self.delete_url, req).await
    }
}
