use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::books::domain::model::{BookEntity, JoinedBook, OwnerProfile};
use crate::books::repository::BookRepository;
use crate::core::domain::{Identifiable, IdentityRef};
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::repository::Repository;

// MemoryBookRepository keeps books and user profiles in process. Clones share
// the same underlying collections.
#[derive(Debug, Clone, Default)]
pub struct MemoryBookRepository {
    books: Arc<RwLock<Vec<BookEntity>>>,
    users: Arc<RwLock<HashMap<IdentityRef, OwnerProfile>>>,
}

impl MemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_user(&self, id: IdentityRef, profile: OwnerProfile) {
        self.users.write().await.insert(id, profile);
    }

    pub async fn count(&self) -> usize {
        self.books.read().await.len()
    }

    async fn join(&self, books: Vec<BookEntity>) -> Vec<JoinedBook> {
        let users = self.users.read().await;
        books.into_iter().map(|entity| {
            let owner_profile = users.get(&entity.owner).cloned();
            JoinedBook { entity, owner_profile }
        }).collect()
    }
}

#[async_trait]
impl Repository<BookEntity> for MemoryBookRepository {
    async fn create(&self, entity: &BookEntity) -> LibraryResult<usize> {
        let mut books = self.books.write().await;
        if books.iter().any(|b| b.book_id == entity.book_id) {
            return Err(LibraryError::database(format!("duplicate book {}", entity.book_id).as_str(), Some("11000".to_string()), false));
        }
        books.push(entity.clone());
        Ok(1)
    }

    async fn update(&self, entity: &BookEntity) -> LibraryResult<usize> {
        let mut books = self.books.write().await;
        match books.iter_mut().find(|b| b.id() == entity.id() && b.owner() == entity.owner()) {
            Some(book) => {
                book.fields = entity.fields.clone();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: &IdentityRef, owner: &IdentityRef) -> LibraryResult<usize> {
        let mut books = self.books.write().await;
        let before = books.len();
        books.retain(|b| !(b.book_id == *id && b.owner == *owner));
        Ok(before - books.len())
    }

    async fn owner_of(&self, id: &IdentityRef) -> LibraryResult<Option<IdentityRef>> {
        let books = self.books.read().await;
        Ok(books.iter().find(|b| b.book_id == *id).map(|b| b.owner))
    }
}

#[async_trait]
impl BookRepository for MemoryBookRepository {
    async fn find_by_id(&self, id: &IdentityRef) -> LibraryResult<Option<JoinedBook>> {
        let found: Vec<BookEntity> = self.books.read().await.iter()
            .filter(|b| b.book_id == *id).cloned().collect();
        Ok(self.join(found).await.pop())
    }

    async fn find_by_owner(&self, owner: &IdentityRef) -> LibraryResult<Vec<JoinedBook>> {
        let found: Vec<BookEntity> = self.books.read().await.iter()
            .filter(|b| b.owner == *owner).cloned().collect();
        Ok(self.join(found).await)
    }

    async fn search(&self, query: &str) -> LibraryResult<Vec<JoinedBook>> {
        let terms = tokenize(query);
        let mut scored: Vec<(usize, BookEntity)> = self.books.read().await.iter()
            .map(|b| (text_score(&terms, b), b.clone()))
            .filter(|(score, _)| *score > 0)
            .collect();
        // stable sort keeps insertion order among equal scores
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(self.join(scored.into_iter().map(|(_, b)| b).collect()).await)
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

// number of query-term occurrences across the indexed text fields
fn text_score(terms: &[String], book: &BookEntity) -> usize {
    let fields = &book.fields;
    let words: Vec<String> = [&fields.title, &fields.author, &fields.isbn, &fields.course, &fields.subject]
        .iter()
        .flat_map(|f| tokenize(f.as_str()))
        .collect();
    terms.iter().map(|t| words.iter().filter(|w| *w == t).count()).sum()
}

#[cfg(test)]
mod tests {
    use crate::books::domain::model::{BookEntity, BookFields, OwnerProfile};
    use crate::books::repository::BookRepository;
    use crate::books::repository::memory_book_repository::MemoryBookRepository;
    use crate::core::domain::IdentityRef;
    use crate::core::repository::Repository;

    fn book(title: &str, author: &str, owner: IdentityRef) -> BookEntity {
        BookEntity::new(BookFields {
            isbn: "isbn".to_string(),
            title: title.to_string(),
            author: author.to_string(),
            subject: "Physics".to_string(),
            course: "PHYS101".to_string(),
        }, owner)
    }

    #[tokio::test]
    async fn test_should_create_get_books() {
        let repo = MemoryBookRepository::new();
        let owner = IdentityRef::new();
        repo.add_user(owner, OwnerProfile { first_name: "Ann".to_string(), last_name: "Lee".to_string(), email: "ann@uni.edu".to_string() }).await;
        let b = book("Mechanics", "Feynman", owner);
        assert_eq!(1, repo.create(&b).await.expect("should create book"));
        assert!(repo.create(&b).await.is_err());

        let loaded = repo.find_by_id(&b.book_id).await.expect("should query").expect("should find book");
        assert_eq!(b, loaded.entity);
        assert_eq!("Ann", loaded.owner_profile.expect("profile").first_name.as_str());
        assert!(repo.find_by_id(&IdentityRef::new()).await.expect("should query").is_none());
    }

    #[tokio::test]
    async fn test_should_update_only_when_owned() {
        let repo = MemoryBookRepository::new();
        let owner = IdentityRef::new();
        let b = book("Mechanics", "Feynman", owner);
        let _ = repo.create(&b).await.expect("should create book");

        let stranger = BookEntity::existing(b.book_id, IdentityRef::new(), book("Hacked", "Eve", owner).fields);
        assert_eq!(0, repo.update(&stranger).await.expect("should run update"));

        let changed = BookEntity::existing(b.book_id, owner, book("Optics", "Hecht", owner).fields);
        assert_eq!(1, repo.update(&changed).await.expect("should run update"));
        let loaded = repo.find_by_id(&b.book_id).await.expect("should query").expect("should find");
        assert_eq!("Optics", loaded.entity.fields.title.as_str());
        assert_eq!(owner, loaded.entity.owner);
    }

    #[tokio::test]
    async fn test_should_delete_only_when_owned() {
        let repo = MemoryBookRepository::new();
        let owner = IdentityRef::new();
        let b = book("Mechanics", "Feynman", owner);
        let _ = repo.create(&b).await.expect("should create book");

        assert_eq!(0, repo.delete(&b.book_id, &IdentityRef::new()).await.expect("should run delete"));
        assert_eq!(Some(owner), repo.owner_of(&b.book_id).await.expect("should query"));
        assert_eq!(1, repo.delete(&b.book_id, &owner).await.expect("should run delete"));
        assert_eq!(None, repo.owner_of(&b.book_id).await.expect("should query"));
        assert_eq!(0, repo.count().await);
    }

    #[tokio::test]
    async fn test_should_find_by_owner() {
        let repo = MemoryBookRepository::new();
        let owner = IdentityRef::new();
        for i in 0..3 {
            let _ = repo.create(&book(format!("title_{}", i).as_str(), "author", owner)).await.expect("should create book");
        }
        let _ = repo.create(&book("other", "author", IdentityRef::new())).await.expect("should create book");
        let res = repo.find_by_owner(&owner).await.expect("should query");
        assert_eq!(3, res.len());
        assert!(res.iter().all(|b| b.owner_profile.is_none()));
        assert!(repo.find_by_owner(&IdentityRef::new()).await.expect("should query").is_empty());
    }

    #[tokio::test]
    async fn test_should_rank_search_results() {
        let repo = MemoryBookRepository::new();
        let owner = IdentityRef::new();
        let once = book("Quantum Mechanics", "Griffiths", owner);
        let twice = book("Quantum Field Theory", "Quantum Press", owner);
        let none = book("Thermodynamics", "Callen", owner);
        for b in [&once, &twice, &none] {
            let _ = repo.create(b).await.expect("should create book");
        }
        let res = repo.search("QUANTUM").await.expect("should search");
        assert_eq!(2, res.len());
        assert_eq!(twice.book_id, res[0].entity.book_id);
        assert_eq!(once.book_id, res[1].entity.book_id);
        assert!(repo.search("relativity").await.expect("should search").is_empty());
        assert!(repo.search("").await.expect("should search").is_empty());
    }
}
