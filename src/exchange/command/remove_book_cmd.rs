use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::core::domain::IdentityRef;
use crate::exchange::domain::ExchangeService;

pub struct RemoveBookCommand {
    exchange_service: Arc<dyn ExchangeService>,
}

impl RemoveBookCommand {
    pub fn new(exchange_service: Arc<dyn ExchangeService>) -> Self {
        Self {
            exchange_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RemoveBookCommandRequest {
    pub book_id: String,
    pub acting_user: IdentityRef,
}

impl RemoveBookCommandRequest {
    pub fn new(book_id: String, acting_user: IdentityRef) -> Self {
        Self {
            book_id,
            acting_user,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RemoveBookCommandResponse {}

impl RemoveBookCommandResponse {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl Command<RemoveBookCommandRequest, RemoveBookCommandResponse> for RemoveBookCommand {
    async fn execute(&self, req: RemoveBookCommandRequest) -> Result<RemoveBookCommandResponse, CommandError> {
        self.exchange_service.remove_book(req.book_id.as_str(), &req.acting_user).await
            .map_err(CommandError::from).map(|_| RemoveBookCommandResponse::new())
    }
}
