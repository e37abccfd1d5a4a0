use serde::{Deserialize, Serialize};
use crate::books::domain::model::BookFields;
use crate::core::library::{LibraryError, LibraryResult};

pub const TITLE_REQUIRED: &str = "Please add a title.";
pub const AUTHOR_REQUIRED: &str = "Please add an author.";

// BookDto is the untrusted book payload as submitted by a user. Every field is
// optional; extraneous whitespace is expected.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BookDto {
    pub isbn: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub course: Option<String>,
}

impl BookDto {
    pub fn new(isbn: &str, title: &str, author: &str, subject: &str, course: &str) -> Self {
        Self {
            isbn: Some(isbn.to_string()),
            title: Some(title.to_string()),
            author: Some(author.to_string()),
            subject: Some(subject.to_string()),
            course: Some(course.to_string()),
        }
    }

    /// Returns the validation messages for this payload, empty when valid.
    ///
    /// Title and author are checked after trimming, so a whitespace-only value
    /// is rejected the same way as a missing one.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = vec![];
        if trimmed(&self.title).is_empty() {
            errors.push(TITLE_REQUIRED.to_string());
        }
        if trimmed(&self.author).is_empty() {
            errors.push(AUTHOR_REQUIRED.to_string());
        }
        errors
    }

    /// Trims isbn, title, author and course; subject is copied verbatim.
    pub fn sanitize(&self) -> BookFields {
        BookFields {
            isbn: trimmed(&self.isbn),
            title: trimmed(&self.title),
            author: trimmed(&self.author),
            subject: self.subject.clone().unwrap_or_default(),
            course: trimmed(&self.course),
        }
    }

    pub fn validated(&self) -> LibraryResult<BookFields> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self.sanitize())
        } else {
            Err(LibraryError::validation(errors))
        }
    }
}

fn trimmed(value: &Option<String>) -> String {
    value.as_deref().map(str::trim).unwrap_or_default().to_string()
}
