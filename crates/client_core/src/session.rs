//! Mixture session identifier and the displays bound to it.

use std::sync::{Arc, RwLock};

use shared::domain::SessionId;

/// A place in the UI that shows the current session identifier.
pub trait IdentifierDisplay: Send + Sync {
    fn show(&self, id: &SessionId);
    fn blank(&self);
}

/// Shared text cell; clones observe the same value.
#[derive(Debug, Clone, Default)]
pub struct DisplaySlot {
    text: Arc<RwLock<String>>,
}

impl DisplaySlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> String {
        self.text
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    fn set(&self, value: &str) {
        let mut guard = self
            .text
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.clear();
        guard.push_str(value);
    }
}

impl IdentifierDisplay for DisplaySlot {
    fn show(&self, id: &SessionId) {
        self.set(id.as_str());
    }

    fn blank(&self) {
        self.set("");
    }
}

/// Holds the current identifier and keeps every subscribed display in step
/// with it.
#[derive(Default)]
pub struct SessionState {
    current: Option<SessionId>,
    displays: Vec<Arc<dyn IdentifierDisplay>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&SessionId> {
        self.current.as_ref()
    }

    pub fn subscribe(&mut self, display: Arc<dyn IdentifierDisplay>) {
        match &self.current {
            Some(id) => display.show(id),
            None => display.blank(),
        }
        self.displays.push(display);
    }

    pub fn display_count(&self) -> usize {
        self.displays.len()
    }

    pub fn replace(&mut self, id: SessionId) {
        self.current = Some(id);
        self.show_identifier();
    }

    pub fn clear(&mut self) {
        self.current = None;
        self.blank_identifier();
    }

    /// Writes the identifier into every display. No-op while absent.
    pub fn show_identifier(&self) {
        if let Some(id) = &self.current {
            for display in &self.displays {
                display.show(id);
            }
        }
    }

    /// Blanks every display. No-op while an identifier is present.
    pub fn blank_identifier(&self) {
        if self.current.is_none() {
            for display in &self.displays {
                display.blank();
            }
        }
    }
}
