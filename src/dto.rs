use serde::Serialize;

/// Bare `{message}` body shared by logout and post deletion.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
