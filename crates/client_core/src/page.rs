//! View model for the upload page: step sections, the mode panels, the
//! selection label, the URL dialog and the lookup response area.

use std::collections::HashMap;

use shared::domain::{PanelMode, Section};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NavigationError {
    #[error("no page section for step {0}")]
    NoSuchStep(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseTone {
    Success,
    #[default]
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResponseArea {
    pub visible: bool,
    pub tone: ResponseTone,
    pub text: String,
}

impl ResponseArea {
    pub fn show(&mut self, tone: ResponseTone, text: impl Into<String>) {
        self.visible = true;
        self.tone = tone;
        self.text = text.into();
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    sections: HashMap<Section, bool>,
    mode: PanelMode,
    pub selection_label: String,
    pub url_dialog_open: bool,
    pub response: ResponseArea,
}

impl Default for PageView {
    fn default() -> Self {
        let sections = Section::ALL
            .into_iter()
            .map(|section| (section, section == Section::MainContent))
            .collect();
        Self {
            sections,
            mode: PanelMode::default(),
            selection_label: String::new(),
            url_dialog_open: false,
            response: ResponseArea::default(),
        }
    }
}

impl PageView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self, section: Section) -> bool {
        self.sections.get(&section).copied().unwrap_or(false)
    }

    pub fn visible_sections(&self) -> Vec<Section> {
        Section::ALL
            .into_iter()
            .filter(|section| self.is_visible(*section))
            .collect()
    }

    /// Hides the section at `step` and reveals the one after it.
    pub fn advance(&mut self, step: u32) -> Result<(), NavigationError> {
        let (current, next) = adjacent_sections(step)?;
        self.sections.insert(current, false);
        self.sections.insert(next, true);
        Ok(())
    }

    /// Reveals the section at `step` and hides the one after it.
    pub fn retreat(&mut self, step: u32) -> Result<(), NavigationError> {
        let (current, next) = adjacent_sections(step)?;
        self.sections.insert(current, true);
        self.sections.insert(next, false);
        Ok(())
    }

    pub fn mode(&self) -> PanelMode {
        self.mode
    }

    pub fn toggle_mode(&mut self, existing_mixture_checked: bool) {
        self.mode = PanelMode::from_checkbox(existing_mixture_checked);
    }

    pub fn lookup_panel_visible(&self) -> bool {
        self.mode == PanelMode::ExistingMixture
    }

    pub fn upload_panel_visible(&self) -> bool {
        self.mode == PanelMode::UploadNewData
    }
}

fn adjacent_sections(step: u32) -> Result<(Section, Section), NavigationError> {
    let current = Section::from_step(step).ok_or(NavigationError::NoSuchStep(step))?;
    let next = step
        .checked_add(1)
        .and_then(Section::from_step)
        .ok_or(NavigationError::NoSuchStep(step + 1))?;
    Ok((current, next))
}
