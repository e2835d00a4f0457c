use std::path::Path;

use shared::{domain::Selection, error::ValidationError};
use url::Url;

const STANDARD_EXTENSIONS: &[&str] = &["xlsx", "xls", "csv", "dat", "txt", "json"];
const WITH_XML_EXTENSIONS: &[&str] = &["xlsx", "xls", "csv", "dat", "txt", "json", "xml"];

/// Extension allow-list for local file uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AllowList {
    #[default]
    Standard,
    WithXml,
}

impl AllowList {
    pub fn from_allow_xml(allow_xml: bool) -> Self {
        if allow_xml {
            AllowList::WithXml
        } else {
            AllowList::Standard
        }
    }

    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            AllowList::Standard => STANDARD_EXTENSIONS,
            AllowList::WithXml => WITH_XML_EXTENSIONS,
        }
    }

    pub fn contains(self, extension: &str) -> bool {
        self.extensions().contains(&extension)
    }

    fn describe(self) -> String {
        let extensions = self.extensions();
        match extensions.split_last() {
            Some((last, rest)) if !rest.is_empty() => format!("{} or {last}", rest.join(", ")),
            Some((last, _)) => (*last).to_string(),
            None => String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SelectionValidator {
    allow_list: AllowList,
}

impl SelectionValidator {
    pub fn new(allow_list: AllowList) -> Self {
        Self { allow_list }
    }

    pub fn allow_list(&self) -> AllowList {
        self.allow_list
    }

    pub fn validate_file(&self, path: &Path) -> Result<Selection, ValidationError> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let extension = file_extension(&file_name).ok_or_else(|| {
            ValidationError::MissingExtension {
                file_name: file_name.clone(),
            }
        })?;

        if !self.allow_list.contains(&extension) {
            return Err(ValidationError::UnsupportedExtension {
                extension,
                allowed: self.allow_list.describe(),
            });
        }

        Ok(Selection::File {
            path: path.to_path_buf(),
            file_name,
        })
    }

    pub fn validate_url(&self, input: &str) -> Result<Selection, ValidationError> {
        let text = input.trim();
        parse_upload_url(text)
            .map(|parsed| Selection::Url {
                text: text.to_string(),
                parsed,
            })
            .ok_or_else(|| ValidationError::MalformedUrl {
                input: input.to_string(),
            })
    }
}

fn file_extension(file_name: &str) -> Option<String> {
    let (stem, extension) = file_name.rsplit_once('.')?;
    if stem.is_empty() || extension.is_empty() {
        return None;
    }
    Some(extension.to_ascii_lowercase())
}

/// http(s) scheme, optional credentials, a host, optional port and any
/// path/query/fragment. Embedded whitespace is rejected rather than escaped.
fn parse_upload_url(input: &str) -> Option<Url> {
    if input.is_empty() || input.chars().any(char::is_whitespace) {
        return None;
    }

    let url = Url::parse(input).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    match url.host_str() {
        Some(host) if !host.is_empty() => Some(url),
        _ => None,
    }
}
