use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::books::dto::BookDto;
use crate::core::command::{Command, CommandError};
use crate::core::domain::IdentityRef;
use crate::exchange::domain::{ExchangeService, UpdateOutcome};

pub struct UpdateBookCommand {
    exchange_service: Arc<dyn ExchangeService>,
}

impl UpdateBookCommand {
    pub fn new(exchange_service: Arc<dyn ExchangeService>) -> Self {
        Self {
            exchange_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateBookCommandRequest {
    pub book_id: String,
    pub acting_user: IdentityRef,
    pub book: BookDto,
}

impl UpdateBookCommandRequest {
    pub fn new(book_id: &str, acting_user: IdentityRef, book: BookDto) -> Self {
        Self {
            book_id: book_id.to_string(),
            acting_user,
            book,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UpdateBookCommandResponse {
    #[serde(flatten)]
    pub outcome: UpdateOutcome,
}

impl UpdateBookCommandResponse {
    pub fn new(outcome: UpdateOutcome) -> Self {
        Self {
            outcome,
        }
    }
}

#[async_trait]
impl Command<UpdateBookCommandRequest, UpdateBookCommandResponse> for UpdateBookCommand {
    async fn execute(&self, req: UpdateBookCommandRequest) -> Result<UpdateBookCommandResponse, CommandError> {
        self.exchange_service.update_book(req.book_id.as_str(), &req.book, &req.acting_user).await
            .map_err(CommandError::from).map(UpdateBookCommandResponse::new)
    }
}
