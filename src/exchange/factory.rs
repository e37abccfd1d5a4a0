use std::sync::Arc;
use crate::books::factory;
use crate::core::domain::Configuration;
use crate::core::library::LibraryResult;
use crate::core::repository::RepositoryStore;
use crate::exchange::domain::ExchangeService;
use crate::exchange::domain::service::ExchangeServiceImpl;

pub async fn create_exchange_service(config: &Configuration, store: RepositoryStore) -> LibraryResult<Arc<dyn ExchangeService>> {
    let book_repo = factory::create_book_repository(config, store).await?;
    Ok(Arc::new(ExchangeServiceImpl::new(config, book_repo)))
}
