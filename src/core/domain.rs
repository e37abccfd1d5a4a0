use std::fmt;
use std::fmt::{Display, Formatter};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use crate::core::library::{LibraryError, LibraryResult};

// IdentityRef is the opaque identifier of a stored book or user. It travels as a
// 24-digit hex string in JSON and as a native ObjectId inside the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IdentityRef(ObjectId);

impl IdentityRef {
    pub fn new() -> Self {
        IdentityRef(ObjectId::new())
    }

    pub fn parse(id: &str) -> LibraryResult<Self> {
        ObjectId::parse_str(id).map(IdentityRef)
            .map_err(|_| LibraryError::invalid_id(format!("invalid identifier {:?}", id).as_str()))
    }

    pub fn is_valid(id: &str) -> bool {
        ObjectId::parse_str(id).is_ok()
    }

    pub fn object_id(&self) -> ObjectId {
        self.0
    }
}

impl Default for IdentityRef {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ObjectId> for IdentityRef {
    fn from(oid: ObjectId) -> Self {
        IdentityRef(oid)
    }
}

impl TryFrom<String> for IdentityRef {
    type Error = LibraryError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        IdentityRef::parse(s.as_str())
    }
}

impl From<IdentityRef> for String {
    fn from(id: IdentityRef) -> Self {
        id.0.to_hex()
    }
}

impl Display for IdentityRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

// Identifiable defines common traits that can be shared by persistent objects
// whose mutation is gated on ownership.
pub trait Identifiable: Sync + Send {
    fn id(&self) -> IdentityRef;
    fn owner(&self) -> IdentityRef;
}

const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017";
const DEFAULT_DATABASE: &str = "textbook_exchange";
const DEFAULT_BOOKS_COLLECTION: &str = "textbooks";
const DEFAULT_USERS_COLLECTION: &str = "users";

// Configuration abstracts config options for the exchange
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct Configuration {
    pub mongodb_uri: String,
    pub database: String,
    pub books_collection: String,
    pub users_collection: String,
}

impl Configuration {
    pub fn new(database: &str) -> Self {
        Configuration {
            mongodb_uri: DEFAULT_MONGODB_URI.to_string(),
            database: database.to_string(),
            books_collection: DEFAULT_BOOKS_COLLECTION.to_string(),
            users_collection: DEFAULT_USERS_COLLECTION.to_string(),
        }
    }

    // Reads MONGODB_URI, MONGODB_DATABASE, BOOKS_COLLECTION and USERS_COLLECTION,
    // falling back to local defaults for anything unset.
    pub fn from_env() -> Self {
        let env_or = |name: &str, default: &str| std::env::var(name).unwrap_or_else(|_| default.to_string());
        Configuration {
            mongodb_uri: env_or("MONGODB_URI", DEFAULT_MONGODB_URI),
            database: env_or("MONGODB_DATABASE", DEFAULT_DATABASE),
            books_collection: env_or("BOOKS_COLLECTION", DEFAULT_BOOKS_COLLECTION),
            users_collection: env_or("USERS_COLLECTION", DEFAULT_USERS_COLLECTION),
        }
    }
}
