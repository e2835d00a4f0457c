use std::{fs, io, path::Path};

use anyhow::Context;
use shared::protocol::{DEFAULT_LOOKUP_PATH, DEFAULT_UPLOAD_PATH};
use tracing::warn;

use crate::validation::AllowList;

pub const DEFAULT_CONFIG_FILE: &str = "uploader.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub server_url: String,
    pub upload_path: String,
    pub lookup_path: String,
    pub allow_xml_uploads: bool,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".into(),
            upload_path: DEFAULT_UPLOAD_PATH.into(),
            lookup_path: DEFAULT_LOOKUP_PATH.into(),
            allow_xml_uploads: false,
        }
    }
}

impl ClientSettings {
    pub fn upload_url(&self) -> String {
        join_endpoint(&self.server_url, &self.upload_path)
    }

    pub fn lookup_url(&self) -> String {
        join_endpoint(&self.server_url, &self.lookup_path)
    }

    pub fn allow_list(&self) -> AllowList {
        AllowList::from_allow_xml(self.allow_xml_uploads)
    }
}

/// Defaults, then `uploader.toml` in the working directory, then the
/// environment. A malformed config file is reported and skipped.
pub fn load_settings() -> ClientSettings {
    let mut settings = match load_settings_from(Path::new(DEFAULT_CONFIG_FILE)) {
        Ok(settings) => settings,
        Err(err) => {
            warn!("config: ignoring {DEFAULT_CONFIG_FILE}: {err:#}");
            ClientSettings::default()
        }
    };
    apply_overrides(&mut settings, |key| std::env::var(key).ok());
    settings
}

/// Defaults overlaid with a flat TOML file of string or boolean values. A
/// missing file yields the defaults.
pub fn load_settings_from(path: &Path) -> anyhow::Result<ClientSettings> {
    let mut settings = ClientSettings::default();

    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(settings),
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read '{}'", path.display()))
        }
    };

    let file_cfg = raw
        .parse::<toml::Table>()
        .with_context(|| format!("failed to parse '{}'", path.display()))?;

    apply_overrides(&mut settings, |key| {
        let file_key = key.trim_start_matches("APP__").to_ascii_lowercase();
        file_cfg.get(&file_key).and_then(|value| value_text(&file_key, value))
    });

    Ok(settings)
}

/// Overlays values found by `lookup` under the `APP__*` keys (plus the
/// `UPLOADER_SERVER_URL` shorthand).
pub fn apply_overrides(settings: &mut ClientSettings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("UPLOADER_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = lookup("APP__SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = lookup("APP__UPLOAD_PATH") {
        settings.upload_path = v;
    }
    if let Some(v) = lookup("APP__LOOKUP_PATH") {
        settings.lookup_path = v;
    }
    if let Some(v) = lookup("APP__ALLOW_XML_UPLOADS") {
        match parse_flag(&v) {
            Some(flag) => settings.allow_xml_uploads = flag,
            None => warn!("config: ignoring non-boolean allow_xml_uploads value '{v}'"),
        }
    }
}

fn value_text(key: &str, value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(text) => Some(text.clone()),
        toml::Value::Boolean(flag) => Some(flag.to_string()),
        toml::Value::Integer(number) => Some(number.to_string()),
        other => {
            warn!("config: ignoring {key}, unsupported {} value", other.type_str());
            None
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn join_endpoint(server_url: &str, path: &str) -> String {
    let base = server_url.trim().trim_end_matches('/');
    let path = path.trim();
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
