use serde::{Deserialize, Serialize};
use crate::books::domain::Book;
use crate::core::domain::{Identifiable, IdentityRef};

// BookFields holds the sanitized, user-editable part of a textbook listing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BookFields {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub subject: String,
    pub course: String,
}

// BookEntity abstracts a textbook listing as persisted in the document store.
// The owner is fixed at creation and never part of an update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookEntity {
    pub book_id: IdentityRef,
    pub owner: IdentityRef,
    #[serde(flatten)]
    pub fields: BookFields,
}

impl BookEntity {
    pub fn new(fields: BookFields, owner: IdentityRef) -> Self {
        Self {
            book_id: IdentityRef::new(),
            owner,
            fields,
        }
    }

    // entity addressing an existing listing, used to carry updated fields
    pub fn existing(book_id: IdentityRef, owner: IdentityRef, fields: BookFields) -> Self {
        Self {
            book_id,
            owner,
            fields,
        }
    }
}

impl Identifiable for BookEntity {
    fn id(&self) -> IdentityRef {
        self.book_id
    }

    fn owner(&self) -> IdentityRef {
        self.owner
    }
}

impl Book for BookEntity {}

// OwnerProfile is the narrowed projection of the owner's user document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

// JoinedBook is what the store returns for reads: the entity plus the owner's
// profile when the owner's user document still exists.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedBook {
    pub entity: BookEntity,
    pub owner_profile: Option<OwnerProfile>,
}

// BookView is the enriched read model handed to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookView {
    pub book_id: IdentityRef,
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub subject: String,
    pub course: String,
    pub owner: IdentityRef,
    pub owner_profile: Option<OwnerProfile>,
    pub is_requester_owner: bool,
}

impl BookView {
    pub fn new(joined: JoinedBook, requester: Option<&IdentityRef>) -> Self {
        let is_requester_owner = joined.entity.is_owned_by(requester);
        let BookEntity { book_id, owner, fields } = joined.entity;
        Self {
            book_id,
            isbn: fields.isbn,
            title: fields.title,
            author: fields.author,
            subject: fields.subject,
            course: fields.course,
            owner,
            owner_profile: joined.owner_profile,
            is_requester_owner,
        }
    }
}
