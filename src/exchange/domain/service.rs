use async_trait::async_trait;
use crate::books::domain::model::{BookEntity, BookView};
use crate::books::dto::BookDto;
use crate::books::repository::BookRepository;
use crate::core::domain::{Configuration, IdentityRef};
use crate::core::library::{LibraryError, LibraryResult};
use crate::exchange::domain::{ExchangeService, UpdateOutcome};

pub(crate) struct ExchangeServiceImpl {
    book_repository: Box<dyn BookRepository>,
}

impl ExchangeServiceImpl {
    pub(crate) fn new(_config: &Configuration, book_repository: Box<dyn BookRepository>) -> Self {
        Self {
            book_repository,
        }
    }

    async fn check_owner(&self, id: &IdentityRef, acting_user: &IdentityRef) -> LibraryResult<()> {
        match self.book_repository.owner_of(id).await? {
            None => Err(LibraryError::not_found(format!("book not found for {}", id).as_str())),
            Some(owner) if owner == *acting_user => Ok(()),
            Some(_) => {
                tracing::warn!(book_id = %id, user = %acting_user, "rejected change by non-owner");
                Err(LibraryError::not_authorized(format!("user {} does not own book {}", acting_user, id).as_str()))
            }
        }
    }

    // explains why an owner-scoped write matched nothing
    async fn rejection(&self, id: &IdentityRef, acting_user: &IdentityRef) -> LibraryError {
        match self.check_owner(id, acting_user).await {
            Err(err) => err,
            Ok(()) => LibraryError::runtime(format!("book {} changed concurrently", id).as_str(), None),
        }
    }
}

fn store_failure(err: LibraryError, action: &str, book_id: &IdentityRef) -> LibraryError {
    tracing::error!(book_id = %book_id, retryable = err.retryable(), "failed to {} book: {}", action, err);
    err
}

#[async_trait]
impl ExchangeService for ExchangeServiceImpl {
    async fn add_book(&self, book: &BookDto, acting_user: &IdentityRef) -> LibraryResult<BookEntity> {
        let entity = BookEntity::new(book.validated()?, *acting_user);
        let _ = self.book_repository.create(&entity).await
            .map_err(|err| store_failure(err, "add", &entity.book_id))?;
        tracing::info!(book_id = %entity.book_id, owner = %acting_user, "book added");
        Ok(entity)
    }

    async fn update_book(&self, book_id: &str, book: &BookDto, acting_user: &IdentityRef) -> LibraryResult<UpdateOutcome> {
        let id = IdentityRef::parse(book_id)?;
        match book.validated() {
            Ok(fields) => {
                let entity = BookEntity::existing(id, *acting_user, fields);
                let matched = self.book_repository.update(&entity).await
                    .map_err(|err| store_failure(err, "update", &id))?;
                if matched == 0 {
                    return Err(self.rejection(&id, acting_user).await);
                }
                tracing::info!(book_id = %id, owner = %acting_user, "book updated");
                Ok(UpdateOutcome::Success)
            }
            Err(LibraryError::Validation { errors }) => {
                // non-owners learn nothing about the validity of their input
                self.check_owner(&id, acting_user).await?;
                Ok(UpdateOutcome::Failure { errors })
            }
            Err(err) => Err(err),
        }
    }

    async fn find_book_by_id(&self, book_id: &str, requester: Option<&IdentityRef>) -> LibraryResult<BookView> {
        let id = IdentityRef::parse(book_id)?;
        self.book_repository.find_by_id(&id).await?
            .map(|joined| BookView::new(joined, requester))
            .ok_or_else(|| LibraryError::not_found(format!("book not found for {}", id).as_str()))
    }

    async fn find_books_by_owner(&self, owner: &IdentityRef, requester: Option<&IdentityRef>) -> LibraryResult<Vec<BookView>> {
        let res = self.book_repository.find_by_owner(owner).await?;
        Ok(res.into_iter().map(|joined| BookView::new(joined, requester)).collect())
    }

    async fn search_books(&self, query: &str, requester: Option<&IdentityRef>) -> LibraryResult<Vec<BookView>> {
        if query.trim().is_empty() {
            return Ok(vec![]);
        }
        let res = self.book_repository.search(query).await?;
        Ok(res.into_iter().map(|joined| BookView::new(joined, requester)).collect())
    }

    async fn remove_book(&self, book_id: &str, acting_user: &IdentityRef) -> LibraryResult<()> {
        let id = IdentityRef::parse(book_id)?;
        let deleted = self.book_repository.delete(&id, acting_user).await
            .map_err(|err| store_failure(err, "remove", &id))?;
        if deleted == 0 {
            return Err(self.rejection(&id, acting_user).await);
        }
        tracing::info!(book_id = %id, owner = %acting_user, "book removed");
        Ok(())
    }
}
