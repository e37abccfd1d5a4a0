use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::books::domain::model::BookView;
use crate::core::command::{Command, CommandError};
use crate::core::domain::IdentityRef;
use crate::exchange::domain::ExchangeService;

pub struct ListUserBooksCommand {
    exchange_service: Arc<dyn ExchangeService>,
}

impl ListUserBooksCommand {
    pub fn new(exchange_service: Arc<dyn ExchangeService>) -> Self {
        Self {
            exchange_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListUserBooksCommandRequest {
    pub user_id: String,
    pub requester: Option<IdentityRef>,
}

impl ListUserBooksCommandRequest {
    pub fn new(user_id: String, requester: Option<IdentityRef>) -> Self {
        Self {
            user_id,
            requester,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListUserBooksCommandResponse {
    pub books: Vec<BookView>,
}

impl ListUserBooksCommandResponse {
    pub fn new(books: Vec<BookView>) -> Self {
        Self {
            books,
        }
    }
}

#[async_trait]
impl Command<ListUserBooksCommandRequest, ListUserBooksCommandResponse> for ListUserBooksCommand {
    async fn execute(&self, req: ListUserBooksCommandRequest) -> Result<ListUserBooksCommandResponse, CommandError> {
        let owner = IdentityRef::parse(req.user_id.as_str())?;
        self.exchange_service.find_books_by_owner(&owner, req.requester.as_ref())
            .await.map_err(CommandError::from).map(ListUserBooksCommandResponse::new)
    }
}
