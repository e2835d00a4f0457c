use anyhow::Result;
use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, StatusCode,
};
use shared::{
    domain::{SessionId, UploadType},
    protocol::{fields, SearchMixtureRequest, SearchMixtureResponse, UploadResponse},
};
use thiserror::Error;

use crate::config::ClientSettings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadSource {
    File { file_name: String, bytes: Vec<u8> },
    Url(String),
}

/// One submission of the upload form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadForm {
    pub upload_type: UploadType,
    pub mixture_id: Option<SessionId>,
    pub source: UploadSource,
}

impl UploadForm {
    pub fn into_multipart(self) -> Form {
        let form = Form::new()
            .text(fields::TYPE, self.upload_type.0)
            .text(
                fields::MIXTURE_ID,
                self.mixture_id.map(|id| id.0).unwrap_or_default(),
            );

        match self.source {
            UploadSource::File { file_name, bytes } => {
                form.part(fields::FILE, Part::bytes(bytes).file_name(file_name))
            }
            UploadSource::Url(url) => form.text(fields::URL, url),
        }
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        source: reqwest::Error,
    },
    #[error("{endpoint} answered with status {status}")]
    Status { endpoint: String, status: StatusCode },
    #[error("invalid response body from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        source: reqwest::Error,
    },
}

#[async_trait]
pub trait UploadBackend: Send + Sync {
    async fn upload(&self, form: UploadForm) -> Result<UploadResponse>;
    async fn search_mixture(&self, request: SearchMixtureRequest) -> Result<SearchMixtureResponse>;
}

pub struct HttpUploadBackend {
    http: Client,
    upload_url: String,
    lookup_url: String,
}

impl HttpUploadBackend {
    pub fn new(settings: &ClientSettings) -> Self {
        Self::with_client(Client::new(), settings)
    }

    pub fn with_client(http: Client, settings: &ClientSettings) -> Self {
        Self {
            http,
            upload_url: settings.upload_url(),
            lookup_url: settings.lookup_url(),
        }
    }

    pub fn upload_url(&self) -> &str {
        &self.upload_url
    }

    pub fn lookup_url(&self) -> &str {
        &self.lookup_url
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(
    endpoint: &str,
    sent: std::result::Result<reqwest::Response, reqwest::Error>,
) -> std::result::Result<T, TransportError> {
    let response = sent.map_err(|source| TransportError::Request {
        endpoint: endpoint.to_string(),
        source,
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(TransportError::Status {
            endpoint: endpoint.to_string(),
            status,
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|source| TransportError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
}

#[async_trait]
impl UploadBackend for HttpUploadBackend {
    async fn upload(&self, form: UploadForm) -> Result<UploadResponse> {
        let sent = self
            .http
            .post(&self.upload_url)
            .multipart(form.into_multipart())
            .send()
            .await;
        Ok(read_json(&self.upload_url, sent).await?)
    }

    async fn search_mixture(&self, request: SearchMixtureRequest) -> Result<SearchMixtureResponse> {
        let sent = self.http.post(&self.lookup_url).json(&request).send().await;
        Ok(read_json(&self.lookup_url, sent).await?)
    }
}
