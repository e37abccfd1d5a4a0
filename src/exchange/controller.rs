use std::collections::HashMap;
use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::Json,
};
use serde_json::Value;
use crate::books::dto::BookDto;
use crate::core::command::Command;
use crate::core::controller::{acting_user, AppState, json_to_server_error, requester, ServerError};
use crate::exchange::command::add_book_cmd::{AddBookCommand, AddBookCommandRequest, AddBookCommandResponse};
use crate::exchange::command::get_book_cmd::{GetBookCommand, GetBookCommandRequest, GetBookCommandResponse};
use crate::exchange::command::list_user_books_cmd::{ListUserBooksCommand, ListUserBooksCommandRequest, ListUserBooksCommandResponse};
use crate::exchange::command::remove_book_cmd::{RemoveBookCommand, RemoveBookCommandRequest, RemoveBookCommandResponse};
use crate::exchange::command::search_books_cmd::{SearchBooksCommand, SearchBooksCommandRequest, SearchBooksCommandResponse};
use crate::exchange::command::update_book_cmd::{UpdateBookCommand, UpdateBookCommandRequest, UpdateBookCommandResponse};

pub async fn add_book(
    State(state): State<AppState>,
    headers: HeaderMap,
    json: Json<Value>) -> Result<Json<AddBookCommandResponse>, ServerError> {
    let user = acting_user(&headers)?;
    let book: BookDto = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let res = AddBookCommand::new(state.service).execute(AddBookCommandRequest::new(user, book)).await?;
    Ok(Json(res))
}

pub async fn update_book(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(book_id): Path<String>,
    json: Json<Value>) -> Result<Json<UpdateBookCommandResponse>, ServerError> {
    let user = acting_user(&headers)?;
    let book: BookDto = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let req = UpdateBookCommandRequest::new(book_id.as_str(), user, book);
    let res = UpdateBookCommand::new(state.service).execute(req).await?;
    Ok(Json(res))
}

pub async fn find_book_by_id(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(book_id): Path<String>) -> Result<Json<GetBookCommandResponse>, ServerError> {
    let req = GetBookCommandRequest::new(book_id, requester(&headers));
    let res = GetBookCommand::new(state.service).execute(req).await?;
    Ok(Json(res))
}

pub async fn find_books_by_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(user_id): Path<String>) -> Result<Json<ListUserBooksCommandResponse>, ServerError> {
    let req = ListUserBooksCommandRequest::new(user_id, requester(&headers));
    let res = ListUserBooksCommand::new(state.service).execute(req).await?;
    Ok(Json(res))
}

pub async fn search_books(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>) -> Result<Json<SearchBooksCommandResponse>, ServerError> {
    let query = params.get("q").map(String::as_str).unwrap_or_default();
    let req = SearchBooksCommandRequest::new(query, requester(&headers));
    let res = SearchBooksCommand::new(state.service).execute(req).await?;
    Ok(Json(res))
}

pub async fn remove_book(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(book_id): Path<String>) -> Result<Json<RemoveBookCommandResponse>, ServerError> {
    let user = acting_user(&headers)?;
    let req = RemoveBookCommandRequest::new(book_id, user);
    let res = RemoveBookCommand::new(state.service).execute(req).await?;
    Ok(Json(res))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use axum::extract::{Path, Query, State};
    use axum::http::{HeaderMap, HeaderValue, StatusCode};
    use axum::response::Json;
    use serde_json::json;
    use crate::core::controller::{AppState, USER_ID_HEADER};
    use crate::core::domain::{Configuration, IdentityRef};
    use crate::core::repository::RepositoryStore;
    use crate::exchange::controller::{add_book, find_book_by_id, remove_book, search_books, update_book};
    use crate::exchange::domain::UpdateOutcome;
    use crate::exchange::factory;

    async fn build_state() -> AppState {
        let config = Configuration::new("test");
        let svc = factory::create_exchange_service(&config, RepositoryStore::InMemory).await.expect("should build service");
        AppState::new(config, svc)
    }

    fn headers_for(user: &IdentityRef) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_str(user.to_string().as_str()).expect("header"));
        headers
    }

    #[tokio::test]
    async fn test_should_handle_book_lifecycle() {
        let state = build_state().await;
        let owner = IdentityRef::new();
        let payload = json!({"isbn": "978-0", "title": " Linear Algebra ", "author": "Strang", "subject": "Math", "course": "MATH220"});

        let added = add_book(State(state.clone()), headers_for(&owner), Json(payload)).await.expect("should add book");
        let book_id = added.0.book.book_id.to_string();
        assert_eq!("Linear Algebra", added.0.book.fields.title.as_str());

        let loaded = find_book_by_id(State(state.clone()), HeaderMap::new(), Path(book_id.clone())).await.expect("should load book");
        assert!(!loaded.0.book.is_requester_owner);

        let update = json!({"isbn": "978-0", "title": "Linear Algebra", "author": "", "subject": "Math", "course": "MATH220"});
        let updated = update_book(State(state.clone()), headers_for(&owner), Path(book_id.clone()), Json(update)).await.expect("should update");
        assert_eq!(UpdateOutcome::Failure { errors: vec!["Please add an author.".to_string()] }, updated.0.outcome);

        let mut params = HashMap::new();
        params.insert("q".to_string(), "strang".to_string());
        let found = search_books(State(state.clone()), headers_for(&owner), Query(params)).await.expect("should search");
        assert_eq!(1, found.0.books.len());

        let denied = remove_book(State(state.clone()), headers_for(&IdentityRef::new()), Path(book_id.clone())).await;
        assert_eq!(StatusCode::FORBIDDEN, denied.expect_err("should deny").0);
        let _ = remove_book(State(state.clone()), headers_for(&owner), Path(book_id.clone())).await.expect("should remove");
        let gone = find_book_by_id(State(state), HeaderMap::new(), Path(book_id)).await;
        assert_eq!(StatusCode::NOT_FOUND, gone.expect_err("should be gone").0);
    }

    #[tokio::test]
    async fn test_should_reject_anonymous_writes() {
        let state = build_state().await;
        let payload = json!({"title": "Calculus", "author": "Stewart"});
        let res = add_book(State(state), HeaderMap::new(), Json(payload)).await;
        assert_eq!(StatusCode::UNAUTHORIZED, res.expect_err("should reject").0);
    }

    #[tokio::test]
    async fn test_should_reject_invalid_payload() {
        let state = build_state().await;
        let owner = IdentityRef::new();
        let res = add_book(State(state.clone()), headers_for(&owner), Json(json!({"title": "", "author": ""}))).await;
        let err = res.expect_err("should reject");
        assert_eq!(StatusCode::BAD_REQUEST, err.0);
        assert_eq!("Please add a title.\nPlease add an author.", err.1.as_str());

        let res = find_book_by_id(State(state), HeaderMap::new(), Path("not-an-id".to_string())).await;
        assert_eq!(StatusCode::BAD_REQUEST, res.expect_err("should reject").0);
    }
}
