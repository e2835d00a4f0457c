use std::{fmt, path::PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

macro_rules! text_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

text_newtype!(SessionId);
text_newtype!(UploadType);

impl From<Uuid> for SessionId {
    fn from(value: Uuid) -> Self {
        Self(value.hyphenated().to_string())
    }
}

impl UploadType {
    /// Tag whose submissions start a new mixture session.
    pub const MIXTURE: &'static str = "Mixture";

    pub fn mixture() -> Self {
        Self::new(Self::MIXTURE)
    }

    pub fn is_mixture(&self) -> bool {
        self.0 == Self::MIXTURE
    }
}

/// What the user picked as the upload source, recorded by the validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    File { path: PathBuf, file_name: String },
    /// `text` is the trimmed input as typed; `parsed` only proves its shape.
    Url { text: String, parsed: Url },
}

impl Selection {
    /// Text shown in the selection label.
    pub fn label(&self) -> &str {
        match self {
            Selection::File { file_name, .. } => file_name,
            Selection::Url { text, .. } => text,
        }
    }

    pub fn is_url(&self) -> bool {
        matches!(self, Selection::Url { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    MainContent,
    NewContent,
    Last,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::MainContent, Section::NewContent, Section::Last];

    /// Sections are numbered from 1 in page order.
    pub fn from_step(step: u32) -> Option<Self> {
        match step {
            1 => Some(Section::MainContent),
            2 => Some(Section::NewContent),
            3 => Some(Section::Last),
            _ => None,
        }
    }

    pub fn step(self) -> u32 {
        match self {
            Section::MainContent => 1,
            Section::NewContent => 2,
            Section::Last => 3,
        }
    }

    pub fn element_id(self) -> &'static str {
        match self {
            Section::MainContent => "mainContent",
            Section::NewContent => "newContent",
            Section::Last => "last",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelMode {
    ExistingMixture,
    #[default]
    UploadNewData,
}

impl PanelMode {
    pub fn from_checkbox(existing_mixture_checked: bool) -> Self {
        if existing_mixture_checked {
            PanelMode::ExistingMixture
        } else {
            PanelMode::UploadNewData
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_steps_round_trip_through_the_page_map() {
        for section in Section::ALL {
            assert_eq!(Section::from_step(section.step()), Some(section));
        }
        assert_eq!(Section::from_step(0), None);
        assert_eq!(Section::from_step(4), None);
    }

    #[test]
    fn only_the_exact_mixture_tag_starts_a_session() {
        assert!(UploadType::new("Mixture").is_mixture());
        assert!(!UploadType::new("mixture").is_mixture());
        assert!(!UploadType::new("Specimen").is_mixture());
    }

    #[test]
    fn selection_label_shows_file_name_or_url_text() {
        let file = Selection::File {
            path: PathBuf::from("/tmp/data/batch.csv"),
            file_name: "batch.csv".into(),
        };
        assert_eq!(file.label(), "batch.csv");
        assert!(!file.is_url());

        let url = Selection::Url {
            text: "https://Example.com".into(),
            parsed: Url::parse("https://Example.com").expect("url"),
        };
        assert_eq!(url.label(), "https://Example.com");
        assert!(url.is_url());
    }
}
