use axum::{
    routing::{get, post},
    Router,
};
use lambda_http::{run, Error};
use textbook_exchange::core::controller::AppState;
use textbook_exchange::core::domain::Configuration;
use textbook_exchange::core::repository::RepositoryStore;
use textbook_exchange::exchange::controller::{
    add_book, find_book_by_id, find_books_by_user, remove_book, search_books, update_book};
use textbook_exchange::exchange::factory;
use textbook_exchange::utils::mongo::setup_tracing;

// See https://docs.aws.amazon.com/lambda/latest/dg/lambda-rust.html
// https://docs.aws.amazon.com/lambda/latest/dg/rust-http-events.html

const DEV_MODE: bool = true;

#[tokio::main]
async fn main() -> Result<(), Error> {
    setup_tracing();

    let (config, store) = if DEV_MODE {
        std::env::set_var("AWS_LAMBDA_FUNCTION_NAME", "_");
        std::env::set_var("AWS_LAMBDA_FUNCTION_MEMORY_SIZE", "4096");
        std::env::set_var("AWS_LAMBDA_FUNCTION_VERSION", "1");
        std::env::set_var("AWS_LAMBDA_RUNTIME_API", "http://[::]:9000/.rt");
        (Configuration::new("dev"), RepositoryStore::InMemory)
    } else {
        (Configuration::from_env(), RepositoryStore::MongoDB)
    };

    let service = factory::create_exchange_service(&config, store).await?;
    let state = AppState::new(config, service);

    let app = Router::new()
        .route("/books", post(add_book))
        .route("/books/:id",
               get(find_book_by_id).put(update_book).delete(remove_book))
        .route("/users/:id/books", get(find_books_by_user))
        .route("/search", get(search_books))
        .with_state(state);

    run(app).await
}
