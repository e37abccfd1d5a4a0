pub mod memory_book_repository;
pub mod mongo_book_repository;

use async_trait::async_trait;
use crate::books::domain::model::{BookEntity, JoinedBook};
use crate::core::domain::IdentityRef;
use crate::core::library::LibraryResult;
use crate::core::repository::Repository;

// Reads are joined with the owner's profile from the users collection.
#[async_trait]
pub trait BookRepository: Repository<BookEntity> {
    async fn find_by_id(&self, id: &IdentityRef) -> LibraryResult<Option<JoinedBook>>;

    async fn find_by_owner(&self, owner: &IdentityRef) -> LibraryResult<Vec<JoinedBook>>;

    // full-text search ordered by descending relevance
    async fn search(&self, query: &str) -> LibraryResult<Vec<JoinedBook>>;
}
