use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::books::domain::model::BookEntity;
use crate::books::dto::BookDto;
use crate::core::command::{Command, CommandError};
use crate::core::domain::IdentityRef;
use crate::exchange::domain::ExchangeService;

pub struct AddBookCommand {
    exchange_service: Arc<dyn ExchangeService>,
}

impl AddBookCommand {
    pub fn new(exchange_service: Arc<dyn ExchangeService>) -> Self {
        Self {
            exchange_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AddBookCommandRequest {
    pub acting_user: IdentityRef,
    pub book: BookDto,
}

impl AddBookCommandRequest {
    pub fn new(acting_user: IdentityRef, book: BookDto) -> Self {
        Self {
            acting_user,
            book,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AddBookCommandResponse {
    pub book: BookEntity,
}

impl AddBookCommandResponse {
    pub fn new(book: BookEntity) -> Self {
        Self {
            book,
        }
    }
}

#[async_trait]
impl Command<AddBookCommandRequest, AddBookCommandResponse> for AddBookCommand {
    async fn execute(&self, req: AddBookCommandRequest) -> Result<AddBookCommandResponse, CommandError> {
        self.exchange_service.add_book(&req.book, &req.acting_user).await
            .map_err(CommandError::from).map(AddBookCommandResponse::new)
    }
}
