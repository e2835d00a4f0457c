use shared::domain::SessionId;
use uuid::Uuid;

/// Fresh mixture session identifier in UUID v4 text form, drawn from the
/// operating system's CSPRNG.
pub fn generate_session_id() -> SessionId {
    SessionId::from(Uuid::new_v4())
}
