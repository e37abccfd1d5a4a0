use crate::books::repository::BookRepository;
use crate::books::repository::memory_book_repository::MemoryBookRepository;
use crate::books::repository::mongo_book_repository::MongoBookRepository;
use crate::core::domain::Configuration;
use crate::core::library::LibraryResult;
use crate::core::repository::RepositoryStore;
use crate::utils::mongo::{build_db, create_book_indexes};

pub async fn create_book_repository(config: &Configuration, store: RepositoryStore) -> LibraryResult<Box<dyn BookRepository>> {
    match store {
        RepositoryStore::MongoDB => {
            let db = build_db(config).await?;
            create_book_indexes(&db, config.books_collection.as_str()).await?;
            Ok(Box::new(MongoBookRepository::new(
                &db, config.books_collection.as_str(), config.users_collection.as_str())))
        }
        RepositoryStore::InMemory => {
            Ok(Box::new(MemoryBookRepository::new()))
        }
    }
}
