use std::{path::PathBuf, sync::Arc};

use shared::{
    domain::{Selection, SessionId, UploadType},
    error::ValidationError,
    protocol::{SearchMixtureRequest, SearchMixtureResponse, UploadResponse},
};
use thiserror::Error;
use tokio::sync::{broadcast, Mutex};
use tracing::{error, info, warn};

pub mod config;
pub mod identifier;
pub mod page;
pub mod session;
pub mod transport;
pub mod validation;

pub use config::ClientSettings;
pub use identifier::generate_session_id;
pub use page::{NavigationError, PageView, ResponseArea, ResponseTone};
pub use session::{DisplaySlot, IdentifierDisplay, SessionState};
pub use transport::{HttpUploadBackend, TransportError, UploadBackend, UploadForm, UploadSource};
pub use validation::{AllowList, SelectionValidator};

/// Shown in the lookup response area when the backend cannot be reached or
/// rejects the request.
pub const LOOKUP_FAILED_MESSAGE: &str = "Mixture not found";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    /// Blocking alert for a rejected selection or submission.
    Alert(String),
    /// Transient toast carrying the backend's upload message.
    Notification(String),
    UploadFailed(String),
    SessionChanged(Option<SessionId>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Found { mixture_id: SessionId, message: String },
    NoMatch { message: String },
}

#[derive(Debug, Error)]
pub enum FormError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("failed to read upload file {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("backend request failed: {0:#}")]
    Backend(anyhow::Error),
}

struct FormState {
    session: SessionState,
    selection: Option<Selection>,
    page: PageView,
}

/// Drives the upload page: selection, submission, mixture lookup and the
/// page's visible state.
pub struct UploadFormController {
    backend: Arc<dyn UploadBackend>,
    validator: SelectionValidator,
    inner: Mutex<FormState>,
    events: broadcast::Sender<FormEvent>,
}

impl UploadFormController {
    pub fn new(backend: Arc<dyn UploadBackend>, validator: SelectionValidator) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            backend,
            validator,
            inner: Mutex::new(FormState {
                session: SessionState::new(),
                selection: None,
                page: PageView::new(),
            }),
            events,
        })
    }

    pub fn from_settings(settings: &ClientSettings) -> Arc<Self> {
        Self::new(
            Arc::new(HttpUploadBackend::new(settings)),
            SelectionValidator::new(settings.allow_list()),
        )
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<FormEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: FormEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    fn alert(&self, err: &ValidationError) {
        warn!("form: {err}");
        self.emit(FormEvent::Alert(err.alert_text()));
    }

    pub async fn bind_identifier_display(&self, display: Arc<dyn IdentifierDisplay>) {
        self.inner.lock().await.session.subscribe(display);
    }

    pub async fn session_id(&self) -> Option<SessionId> {
        self.inner.lock().await.session.current().cloned()
    }

    pub async fn selection(&self) -> Option<Selection> {
        self.inner.lock().await.selection.clone()
    }

    pub async fn page(&self) -> PageView {
        self.inner.lock().await.page.clone()
    }

    pub async fn select_file(&self, path: impl Into<PathBuf>) -> Result<(), ValidationError> {
        let path = path.into();
        let selection = match self.validator.validate_file(&path) {
            Ok(selection) => selection,
            Err(err) => {
                self.alert(&err);
                return Err(err);
            }
        };

        let mut inner = self.inner.lock().await;
        inner.page.selection_label = selection.label().to_string();
        inner.selection = Some(selection);
        Ok(())
    }

    pub async fn open_url_dialog(&self) {
        self.inner.lock().await.page.url_dialog_open = true;
    }

    /// Accepting a URL also closes the entry dialog; a rejected one leaves
    /// it open for correction.
    pub async fn enter_url(&self, input: &str) -> Result<(), ValidationError> {
        let selection = match self.validator.validate_url(input) {
            Ok(selection) => selection,
            Err(err) => {
                self.alert(&err);
                return Err(err);
            }
        };

        let mut inner = self.inner.lock().await;
        inner.page.selection_label = selection.label().to_string();
        inner.page.url_dialog_open = false;
        inner.selection = Some(selection);
        Ok(())
    }

    pub async fn submit_upload(&self, upload_type: UploadType) -> Result<UploadResponse, FormError> {
        let (mixture_id, selection) = {
            let mut inner = self.inner.lock().await;
            if upload_type.is_mixture() {
                let mixture_id = generate_session_id();
                info!(mixture_id = %mixture_id, "upload: generated new mixture id");
                inner.session.replace(mixture_id);
                self.emit(FormEvent::SessionChanged(inner.session.current().cloned()));
            } else {
                info!(
                    upload_type = %upload_type,
                    mixture_id = ?inner.session.current().map(SessionId::as_str),
                    "upload: reusing current mixture id"
                );
            }
            (inner.session.current().cloned(), inner.selection.clone())
        };

        let Some(selection) = selection else {
            let err = ValidationError::NothingSelected;
            self.alert(&err);
            return Err(err.into());
        };

        let source = match selection {
            Selection::Url { text, .. } => UploadSource::Url(text),
            Selection::File { path, file_name } => match tokio::fs::read(&path).await {
                Ok(bytes) => UploadSource::File { file_name, bytes },
                Err(source) => {
                    let err = FormError::ReadFile { path, source };
                    error!("upload: {err}");
                    self.emit(FormEvent::UploadFailed(err.to_string()));
                    return Err(err);
                }
            },
        };

        let form = UploadForm {
            upload_type,
            mixture_id,
            source,
        };

        match self.backend.upload(form).await {
            Ok(response) => {
                info!(message = %response.message, "upload: accepted");
                self.emit(FormEvent::Notification(response.message.clone()));
                Ok(response)
            }
            Err(err) => {
                error!("upload: request failed: {err:#}");
                self.emit(FormEvent::UploadFailed(format!("{err:#}")));
                Err(FormError::Backend(err))
            }
        }
    }

    pub async fn search_mixture(&self, mixture_name: &str) -> Result<LookupOutcome, FormError> {
        let result = self
            .backend
            .search_mixture(SearchMixtureRequest {
                mixture_name: mixture_name.to_string(),
            })
            .await;

        let mut inner = self.inner.lock().await;
        let outcome = match result {
            Ok(SearchMixtureResponse {
                message,
                mixture_id: Some(mixture_id),
            }) if !mixture_id.is_empty() => {
                let mixture_id = SessionId::new(mixture_id);
                info!(mixture_id = %mixture_id, "lookup: adopted existing mixture id");
                inner.session.replace(mixture_id.clone());
                inner.page.response.hide();
                Ok(LookupOutcome::Found {
                    mixture_id,
                    message,
                })
            }
            Ok(SearchMixtureResponse { message, .. }) => {
                info!(mixture_name, "lookup: no matching mixture");
                inner.session.clear();
                inner.page.response.show(ResponseTone::Danger, message.clone());
                Ok(LookupOutcome::NoMatch { message })
            }
            Err(err) => {
                warn!(mixture_name, "lookup: request failed: {err:#}");
                inner.session.clear();
                inner
                    .page
                    .response
                    .show(ResponseTone::Danger, LOOKUP_FAILED_MESSAGE);
                Err(FormError::Backend(err))
            }
        };
        self.emit(FormEvent::SessionChanged(inner.session.current().cloned()));
        outcome
    }

    pub async fn advance(&self, step: u32) -> Result<(), NavigationError> {
        self.inner.lock().await.page.advance(step)
    }

    pub async fn retreat(&self, step: u32) -> Result<(), NavigationError> {
        self.inner.lock().await.page.retreat(step)
    }

    pub async fn toggle_mode(&self, existing_mixture_checked: bool) {
        self.inner
            .lock()
            .await
            .page
            .toggle_mode(existing_mixture_checked);
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
