use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::books::domain::model::BookView;
use crate::core::command::{Command, CommandError};
use crate::core::domain::IdentityRef;
use crate::exchange::domain::ExchangeService;

pub struct GetBookCommand {
    exchange_service: Arc<dyn ExchangeService>,
}

impl GetBookCommand {
    pub fn new(exchange_service: Arc<dyn ExchangeService>) -> Self {
        Self {
            exchange_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GetBookCommandRequest {
    pub book_id: String,
    pub requester: Option<IdentityRef>,
}

impl GetBookCommandRequest {
    pub fn new(book_id: String, requester: Option<IdentityRef>) -> Self {
        Self {
            book_id,
            requester,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GetBookCommandResponse {
    pub book: BookView,
}

impl GetBookCommandResponse {
    pub fn new(book: BookView) -> Self {
        Self {
            book,
        }
    }
}

#[async_trait]
impl Command<GetBookCommandRequest, GetBookCommandResponse> for GetBookCommand {
    async fn execute(&self, req: GetBookCommandRequest) -> Result<GetBookCommandResponse, CommandError> {
        self.exchange_service.find_book_by_id(req.book_id.as_str(), req.requester.as_ref())
            .await.map_err(CommandError::from).map(GetBookCommandResponse::new)
    }
}
