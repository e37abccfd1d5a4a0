use std::sync::Arc;
use axum::http::{HeaderMap, StatusCode};
use crate::core::command::CommandError;
use crate::core::domain::{Configuration, IdentityRef};
use crate::exchange::domain::ExchangeService;

// Header carrying the authenticated user id, set by the upstream auth layer.
pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Clone)]
pub struct AppState {
    pub config: Configuration,
    pub service: Arc<dyn ExchangeService>,
}

impl AppState {
    pub fn new(config: Configuration, service: Arc<dyn ExchangeService>) -> AppState {
        AppState {
            config,
            service,
        }
    }
}

pub type ServerError = (StatusCode, String);

pub fn json_to_server_error(err: serde_json::Error) -> ServerError {
    (StatusCode::BAD_REQUEST, format!("{}", err))
}

// acting user for mutations; anonymous callers are rejected
pub fn acting_user(headers: &HeaderMap) -> Result<IdentityRef, ServerError> {
    requester(headers).ok_or((StatusCode::UNAUTHORIZED, "missing or invalid user identity".to_string()))
}

// requester for reads; anonymous visitors are allowed
pub fn requester(headers: &HeaderMap) -> Option<IdentityRef> {
    headers.get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| IdentityRef::parse(v.trim()).ok())
}

impl From<CommandError> for ServerError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Access { .. } => {
                (StatusCode::FORBIDDEN, format!("{:?}", err))
            }
            CommandError::Database { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("{:?}", err))
            }
            CommandError::InvalidId { .. } => {
                (StatusCode::BAD_REQUEST, format!("{:?}", err))
            }
            CommandError::NotFound { .. } => {
                (StatusCode::NOT_FOUND, format!("{:?}", err))
            }
            CommandError::Runtime { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("{:?}", err))
            }
            CommandError::Serialization { .. } => {
                (StatusCode::BAD_REQUEST, format!("{:?}", err))
            }
            CommandError::Validation { errors } => {
                (StatusCode::BAD_REQUEST, errors.join("\n"))
            }
        }
    }
}
