use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::books::domain::model::BookView;
use crate::core::command::{Command, CommandError};
use crate::core::domain::IdentityRef;
use crate::exchange::domain::ExchangeService;

pub struct SearchBooksCommand {
    exchange_service: Arc<dyn ExchangeService>,
}

impl SearchBooksCommand {
    pub fn new(exchange_service: Arc<dyn ExchangeService>) -> Self {
        Self {
            exchange_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchBooksCommandRequest {
    pub query: String,
    pub requester: Option<IdentityRef>,
}

impl SearchBooksCommandRequest {
    pub fn new(query: &str, requester: Option<IdentityRef>) -> Self {
        Self {
            query: query.to_string(),
            requester,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchBooksCommandResponse {
    pub books: Vec<BookView>,
}

impl SearchBooksCommandResponse {
    pub fn new(books: Vec<BookView>) -> Self {
        Self {
            books,
        }
    }
}

#[async_trait]
impl Command<SearchBooksCommandRequest, SearchBooksCommandResponse> for SearchBooksCommand {
    async fn execute(&self, req: SearchBooksCommandRequest) -> Result<SearchBooksCommandResponse, CommandError> {
        self.exchange_service.search_books(req.query.as_str(), req.requester.as_ref())
            .await.map_err(CommandError::from).map(SearchBooksCommandResponse::new)
    }
}
