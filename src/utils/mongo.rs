use mongodb::bson::{doc, Document};
use mongodb::error::{Error, ErrorKind, WriteFailure, RETRYABLE_WRITE_ERROR, TRANSIENT_TRANSACTION_ERROR};
use mongodb::options::IndexOptions;
use mongodb::{Client, Database, IndexModel};
use crate::core::domain::{Configuration, IdentityRef};
use crate::core::library::{LibraryError, LibraryResult};

pub(crate) async fn build_db(config: &Configuration) -> LibraryResult<Database> {
    let client = Client::with_uri_str(config.mongodb_uri.as_str()).await?;
    Ok(client.database(config.database.as_str()))
}

// text index backing search plus an owner index for profile listings
pub(crate) async fn create_book_indexes(db: &Database, collection: &str) -> LibraryResult<()> {
    let books = db.collection::<Document>(collection);
    let text_index = IndexModel::builder()
        .keys(doc! {
            "title": "text",
            "author": "text",
            "isbn": "text",
            "course": "text",
            "subject": "text",
        })
        .options(IndexOptions::builder().name(format!("{}_text_ndx", collection)).build())
        .build();
    let owner_index = IndexModel::builder()
        .keys(doc! { "owner": 1 })
        .options(IndexOptions::builder().name(format!("{}_owner_ndx", collection)).build())
        .build();
    match books.create_indexes(vec![text_index, owner_index], None).await {
        Ok(_) => Ok(()),
        Err(err) => {
            Err(LibraryError::database(format!("failed to create {} indexes due to {}",
                                               collection, err).as_str(), reason_code(&err), false))
        }
    }
}

pub(crate) fn parse_string_field(name: &str, map: &Document) -> String {
    map.get_str(name).unwrap_or("").to_string()
}

pub(crate) fn parse_object_id(name: &str, map: &Document) -> LibraryResult<IdentityRef> {
    map.get_object_id(name).map(IdentityRef::from).map_err(|err| {
        LibraryError::serialization(format!("failed to read {} due to {:?}", name, err).as_str())
    })
}

// required to enable CloudWatch error logging by the runtime
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        // disable printing the name of the module in every log line.
        .with_target(false)
        // ANSI color codes show up in a confusing manner in CloudWatch logs.
        .with_ansi(false)
        // CloudWatch adds the ingestion time.
        .without_time()
        .json()
        .init();
}

impl From<Error> for LibraryError {
    fn from(err: Error) -> Self {
        let retryable = retryable_mongo_error(&err);
        LibraryError::database(format!("{:?}", err).as_str(), reason_code(&err), retryable)
    }
}

fn retryable_mongo_error(err: &Error) -> bool {
    if err.contains_label(RETRYABLE_WRITE_ERROR) || err.contains_label(TRANSIENT_TRANSACTION_ERROR) {
        return true;
    }
    matches!(err.kind.as_ref(), ErrorKind::Io(_) | ErrorKind::ServerSelection { .. })
}

fn reason_code(err: &Error) -> Option<String> {
    match err.kind.as_ref() {
        ErrorKind::Command(cmd) => { Some(cmd.code.to_string()) }
        ErrorKind::Write(WriteFailure::WriteError(we)) => { Some(we.code.to_string()) }
        ErrorKind::Write(WriteFailure::WriteConcernError(wc)) => { Some(wc.code.to_string()) }
        ErrorKind::Io(_) => { Some("Io".to_string()) }
        ErrorKind::ServerSelection { .. } => { Some("ServerSelection".to_string()) }
        _ => { None }
    }
}

#[cfg(test)]
mod tests {
    use mongodb::bson::{doc, Bson};
    use crate::core::domain::IdentityRef;
    use crate::core::library::LibraryError;
    use crate::utils::mongo::{parse_object_id, parse_string_field};

    #[tokio::test]
    async fn test_should_parse_fields() {
        let id = IdentityRef::new();
        let map = doc! { "title": "Optics", "owner": id.object_id(), "count": 3 };
        assert_eq!("Optics", parse_string_field("title", &map).as_str());
        assert_eq!("", parse_string_field("missing", &map).as_str());
        assert_eq!("", parse_string_field("count", &map).as_str());
        assert_eq!(id, parse_object_id("owner", &map).expect("should parse owner"));
        assert!(matches!(parse_object_id("title", &map), Err(LibraryError::Serialization{ message: _ })));
    }

    #[tokio::test]
    async fn test_should_convert_mongo_errors() {
        let io = mongodb::error::Error::from(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset"));
        let err = LibraryError::from(io);
        assert!(err.retryable());
        assert!(matches!(err, LibraryError::Database{ reason_code: Some(ref code), .. } if code == "Io"));

        let decode = mongodb::bson::from_bson::<String>(Bson::Int32(7)).expect_err("should not decode");
        let err = LibraryError::from(mongodb::error::Error::from(decode));
        assert!(!err.retryable());
        assert!(matches!(err, LibraryError::Database{ reason_code: None, .. }));
    }
}
