use serde::{Deserialize, Serialize};

pub const DEFAULT_UPLOAD_PATH: &str = "/dataUpload";
pub const DEFAULT_LOOKUP_PATH: &str = "/search-mixture";

/// Multipart field names of the upload form.
pub mod fields {
    pub const TYPE: &str = "type";
    pub const MIXTURE_ID: &str = "Mixture_ID";
    pub const FILE: &str = "file";
    pub const URL: &str = "url";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchMixtureRequest {
    #[serde(rename = "mixtureName")]
    pub mixture_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchMixtureResponse {
    pub message: String,
    #[serde(
        rename = "mixtureID",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub mixture_id: Option<String>,
}
