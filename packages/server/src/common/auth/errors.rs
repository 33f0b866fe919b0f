use thiserror::Error;

/// Authorization failures surfaced to API callers.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Organiser access required")]
    OrganiserRequired,
}
