use thiserror::Error;

/// Rejections raised before anything is sent. The display text is what the
/// user is shown in the blocking alert.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid file. Please select a {allowed} file.")]
    UnsupportedExtension { extension: String, allowed: String },
    #[error("Invalid file. '{file_name}' has no file extension.")]
    MissingExtension { file_name: String },
    #[error("Please enter a valid URL.")]
    MalformedUrl { input: String },
    #[error("Please select a file or enter a URL before uploading.")]
    NothingSelected,
}

impl ValidationError {
    pub fn alert_text(&self) -> String {
        self.to_string()
    }
}
