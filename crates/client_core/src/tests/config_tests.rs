use super::*;

use std::collections::HashMap;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_point_at_the_standard_endpoints() {
    let settings = ClientSettings::default();
    assert_eq!(settings.upload_url(), "http://127.0.0.1:5000/dataUpload");
    assert_eq!(settings.lookup_url(), "http://127.0.0.1:5000/search-mixture");
    assert_eq!(settings.allow_list(), AllowList::Standard);
}

#[test]
fn endpoint_join_tolerates_slashes() {
    let settings = ClientSettings {
        server_url: "https://lab.example.org/app/".into(),
        upload_path: "dataUpload".into(),
        ..ClientSettings::default()
    };
    assert_eq!(settings.upload_url(), "https://lab.example.org/app/dataUpload");
    assert_eq!(
        settings.lookup_url(),
        "https://lab.example.org/app/search-mixture"
    );
}

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = load_settings_from(&dir.path().join("absent.toml")).expect("load");
    assert_eq!(settings, ClientSettings::default());
}

#[test]
fn file_values_override_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("uploader.toml");
    fs::write(
        &path,
        "server_url = \"http://backend:8080\"\nlookup_path = \"/mixtures/search\"\nallow_xml_uploads = \"true\"\n",
    )
    .expect("write config");

    let settings = load_settings_from(&path).expect("load");
    assert_eq!(settings.server_url, "http://backend:8080");
    assert_eq!(settings.upload_path, DEFAULT_UPLOAD_PATH);
    assert_eq!(settings.lookup_url(), "http://backend:8080/mixtures/search");
    assert_eq!(settings.allow_list(), AllowList::WithXml);
}

#[test]
fn bare_boolean_flag_does_not_discard_the_rest_of_the_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("uploader.toml");
    fs::write(
        &path,
        "server_url = \"http://backend:8080\"\nallow_xml_uploads = true\n",
    )
    .expect("write config");

    let settings = load_settings_from(&path).expect("load");
    assert_eq!(settings.server_url, "http://backend:8080");
    assert!(settings.allow_xml_uploads);
}

#[test]
fn unsupported_value_types_are_skipped() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("uploader.toml");
    fs::write(
        &path,
        "server_url = [\"http://a\", \"http://b\"]\nupload_path = \"/upload\"\n",
    )
    .expect("write config");

    let settings = load_settings_from(&path).expect("load");
    assert_eq!(settings.server_url, ClientSettings::default().server_url);
    assert_eq!(settings.upload_path, "/upload");
}

#[test]
fn malformed_file_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("uploader.toml");
    fs::write(&path, "server_url = [not, a, string").expect("write config");

    let err = load_settings_from(&path).expect_err("must fail");
    assert!(format!("{err:#}").contains("failed to parse"), "{err:#}");
}

#[test]
fn app_prefixed_keys_win_over_shorthand() {
    let mut settings = ClientSettings::default();
    apply_overrides(
        &mut settings,
        lookup_from(&[
            ("UPLOADER_SERVER_URL", "http://short:1"),
            ("APP__SERVER_URL", "http://long:2"),
            ("APP__UPLOAD_PATH", "/upload"),
        ]),
    );
    assert_eq!(settings.upload_url(), "http://long:2/upload");
}

#[test]
fn unparseable_flag_keeps_previous_value() {
    let mut settings = ClientSettings {
        allow_xml_uploads: true,
        ..ClientSettings::default()
    };
    apply_overrides(
        &mut settings,
        lookup_from(&[("APP__ALLOW_XML_UPLOADS", "maybe")]),
    );
    assert!(settings.allow_xml_uploads);

    apply_overrides(&mut settings, lookup_from(&[("APP__ALLOW_XML_UPLOADS", "off")]));
    assert!(!settings.allow_xml_uploads);
}
