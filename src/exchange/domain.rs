pub mod service;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::books::domain::model::{BookEntity, BookView};
use crate::books::dto::BookDto;
use crate::core::domain::IdentityRef;
use crate::core::library::LibraryResult;

// Outcome of an update by the owner. Rejected field values are a soft failure
// reported as data rather than an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum UpdateOutcome {
    Success,
    Failure { errors: Vec<String> },
}

impl UpdateOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateOutcome::Success => "success",
            UpdateOutcome::Failure { .. } => "failure",
        }
    }
}

#[async_trait]
pub trait ExchangeService: Sync + Send {
    async fn add_book(&self, book: &BookDto, acting_user: &IdentityRef) -> LibraryResult<BookEntity>;
    async fn update_book(&self, book_id: &str, book: &BookDto, acting_user: &IdentityRef) -> LibraryResult<UpdateOutcome>;
    async fn find_book_by_id(&self, book_id: &str, requester: Option<&IdentityRef>) -> LibraryResult<BookView>;
    async fn find_books_by_owner(&self, owner: &IdentityRef, requester: Option<&IdentityRef>) -> LibraryResult<Vec<BookView>>;
    async fn search_books(&self, query: &str, requester: Option<&IdentityRef>) -> LibraryResult<Vec<BookView>>;
    async fn remove_book(&self, book_id: &str, acting_user: &IdentityRef) -> LibraryResult<()>;
}

#[cfg(test)]
mod tests {
    use crate::exchange::domain::UpdateOutcome;

    #[tokio::test]
    async fn test_should_serialize_outcome() {
        assert_eq!("success", UpdateOutcome::Success.as_str());
        let failure = UpdateOutcome::Failure { errors: vec!["Please add a title.".to_string()] };
        assert_eq!("failure", failure.as_str());
        let json = serde_json::to_value(&failure).expect("should serialize");
        assert_eq!("failure", json["status"]);
        assert_eq!("Please add a title.", json["errors"][0]);
        assert_eq!("success", serde_json::to_value(UpdateOutcome::Success).expect("should serialize")["status"]);
    }
}
