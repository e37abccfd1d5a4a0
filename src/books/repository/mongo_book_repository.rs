use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::FindOneOptions;
use mongodb::{Collection, Database};

use crate::books::domain::model::{BookEntity, BookFields, JoinedBook, OwnerProfile};
use crate::books::repository::BookRepository;
use crate::core::domain::IdentityRef;
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::repository::Repository;
use crate::utils::mongo::{parse_object_id, parse_string_field};

#[derive(Debug)]
pub struct MongoBookRepository {
    books: Collection<Document>,
    users_collection: String,
}

impl MongoBookRepository {
    pub fn new(db: &Database, books_collection: &str, users_collection: &str) -> Self {
        Self {
            books: db.collection::<Document>(books_collection),
            users_collection: users_collection.to_string(),
        }
    }

    async fn aggregate(&self, pipeline: Vec<Document>) -> LibraryResult<Vec<JoinedBook>> {
        let docs: Vec<Document> = self.books
            .aggregate(pipeline, None)
            .await?
            .try_collect()
            .await?;
        docs.iter().map(map_to_joined_book).collect()
    }
}

#[async_trait]
impl Repository<BookEntity> for MongoBookRepository {
    async fn create(&self, entity: &BookEntity) -> LibraryResult<usize> {
        self.books
            .insert_one(to_document(entity), None)
            .await.map(|_| 1).map_err(LibraryError::from)
    }

    async fn update(&self, entity: &BookEntity) -> LibraryResult<usize> {
        let fields = &entity.fields;
        self.books
            .update_one(
                owned_filter(&entity.book_id, &entity.owner),
                doc! {
                    "$set": {
                        "isbn": fields.isbn.as_str(),
                        "title": fields.title.as_str(),
                        "author": fields.author.as_str(),
                        "subject": fields.subject.as_str(),
                        "course": fields.course.as_str(),
                    }
                },
                None)
            .await.map(|res| res.matched_count as usize).map_err(LibraryError::from)
    }

    async fn delete(&self, id: &IdentityRef, owner: &IdentityRef) -> LibraryResult<usize> {
        self.books
            .delete_one(owned_filter(id, owner), None)
            .await.map(|res| res.deleted_count as usize).map_err(LibraryError::from)
    }

    async fn owner_of(&self, id: &IdentityRef) -> LibraryResult<Option<IdentityRef>> {
        let options = FindOneOptions::builder().projection(doc! { "owner": 1 }).build();
        match self.books.find_one(doc! { "_id": id.object_id() }, options).await? {
            Some(found) => parse_object_id("owner", &found).map(Some),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl BookRepository for MongoBookRepository {
    async fn find_by_id(&self, id: &IdentityRef) -> LibraryResult<Option<JoinedBook>> {
        let mut books = self.aggregate(find_by_id_pipeline(id, self.users_collection.as_str())).await?;
        if books.len() > 1 {
            return Err(LibraryError::database(format!("too many books for {}", id).as_str(), None, false));
        }
        Ok(books.pop())
    }

    async fn find_by_owner(&self, owner: &IdentityRef) -> LibraryResult<Vec<JoinedBook>> {
        self.aggregate(find_by_owner_pipeline(owner, self.users_collection.as_str())).await
    }

    async fn search(&self, query: &str) -> LibraryResult<Vec<JoinedBook>> {
        self.aggregate(search_pipeline(query, self.users_collection.as_str())).await
    }
}

fn owned_filter(id: &IdentityRef, owner: &IdentityRef) -> Document {
    doc! { "_id": id.object_id(), "owner": owner.object_id() }
}

pub(crate) fn find_by_id_pipeline(id: &IdentityRef, users_collection: &str) -> Vec<Document> {
    let mut pipeline = vec![doc! { "$match": { "_id": id.object_id() } }];
    pipeline.extend(owner_join_stages(users_collection));
    pipeline
}

pub(crate) fn find_by_owner_pipeline(owner: &IdentityRef, users_collection: &str) -> Vec<Document> {
    let mut pipeline = vec![doc! { "$match": { "owner": owner.object_id() } }];
    pipeline.extend(owner_join_stages(users_collection));
    pipeline
}

// $text matching is not exact; results are ranked by the text score
pub(crate) fn search_pipeline(query: &str, users_collection: &str) -> Vec<Document> {
    let mut pipeline = vec![
        doc! { "$match": { "$text": { "$search": query } } },
        doc! { "$sort": { "score": { "$meta": "textScore" } } },
    ];
    pipeline.extend(owner_join_stages(users_collection));
    pipeline
}

fn owner_join_stages(users_collection: &str) -> Vec<Document> {
    vec![
        doc! {
            "$lookup": {
                "from": users_collection,
                "let": { "owner": "$owner" },
                "pipeline": [
                    { "$match": { "$expr": { "$eq": ["$_id", "$$owner"] } } },
                    { "$project": { "_id": 0, "firstName": 1, "lastName": 1, "email": 1 } },
                ],
                "as": "ownerDoc",
            }
        },
        doc! {
            "$project": {
                "isbn": 1,
                "title": 1,
                "author": 1,
                "subject": 1,
                "course": 1,
                "owner": 1,
                "ownerProfile": { "$arrayElemAt": ["$ownerDoc", 0] },
            }
        },
    ]
}

fn to_document(entity: &BookEntity) -> Document {
    doc! {
        "_id": entity.book_id.object_id(),
        "isbn": entity.fields.isbn.as_str(),
        "title": entity.fields.title.as_str(),
        "author": entity.fields.author.as_str(),
        "subject": entity.fields.subject.as_str(),
        "course": entity.fields.course.as_str(),
        "owner": entity.owner.object_id(),
    }
}

pub(crate) fn map_to_joined_book(map: &Document) -> LibraryResult<JoinedBook> {
    let entity = BookEntity::existing(
        parse_object_id("_id", map)?,
        parse_object_id("owner", map)?,
        BookFields {
            isbn: parse_string_field("isbn", map),
            title: parse_string_field("title", map),
            author: parse_string_field("author", map),
            subject: parse_string_field("subject", map),
            course: parse_string_field("course", map),
        });
    // the lookup already narrows the user document to its public profile
    let owner_profile = map.get_document("ownerProfile").ok().map(|user| OwnerProfile {
        first_name: parse_string_field("firstName", user),
        last_name: parse_string_field("lastName", user),
        email: parse_string_field("email", user),
    });
    Ok(JoinedBook { entity, owner_profile })
}

#[cfg(test)]
mod tests {
    use mongodb::bson::{doc, Bson};

    use crate::books::domain::model::{BookEntity, BookFields};
    use crate::books::repository::mongo_book_repository::{find_by_id_pipeline, find_by_owner_pipeline, map_to_joined_book, search_pipeline, to_document};
    use crate::core::domain::IdentityRef;

    fn entity() -> BookEntity {
        BookEntity::new(BookFields {
            isbn: "isbn".to_string(),
            title: "Linear Algebra".to_string(),
            author: "Strang".to_string(),
            subject: "Math".to_string(),
            course: "MATH221".to_string(),
        }, IdentityRef::new())
    }

    #[tokio::test]
    async fn test_should_build_find_by_id_pipeline() {
        let id = IdentityRef::new();
        let pipeline = find_by_id_pipeline(&id, "users");
        assert_eq!(3, pipeline.len());
        assert_eq!(&doc! { "_id": id.object_id() }, pipeline[0].get_document("$match").expect("match"));
        let lookup = pipeline[1].get_document("$lookup").expect("lookup");
        assert_eq!("users", lookup.get_str("from").expect("from"));
        assert_eq!(&doc! { "owner": "$owner" }, lookup.get_document("let").expect("let"));

        // only the public profile fields of the user document are read
        let stages = lookup.get_array("pipeline").expect("pipeline");
        let profile = stages.iter()
            .filter_map(|stage| stage.as_document())
            .find_map(|stage| stage.get_document("$project").ok())
            .expect("profile projection");
        let mut fields: Vec<&str> = profile.iter()
            .filter(|(_, v)| **v == Bson::Int32(1))
            .map(|(k, _)| k.as_str())
            .collect();
        fields.sort();
        assert_eq!(vec!["email", "firstName", "lastName"], fields);
        assert_eq!(Some(&Bson::Int32(0)), profile.get("_id"));
        assert_eq!(4, profile.len());

        let project = pipeline[2].get_document("$project").expect("project");
        assert!(project.contains_key("ownerProfile"));
        assert!(project.contains_key("owner"));
    }

    #[tokio::test]
    async fn test_should_build_find_by_owner_pipeline() {
        let owner = IdentityRef::new();
        let pipeline = find_by_owner_pipeline(&owner, "people");
        assert_eq!(&doc! { "owner": owner.object_id() }, pipeline[0].get_document("$match").expect("match"));
        assert_eq!("people", pipeline[1].get_document("$lookup").expect("lookup").get_str("from").expect("from"));
    }

    #[tokio::test]
    async fn test_should_build_search_pipeline() {
        let pipeline = search_pipeline("calculus", "users");
        assert_eq!(4, pipeline.len());
        assert_eq!(&doc! { "$text": { "$search": "calculus" } }, pipeline[0].get_document("$match").expect("match"));
        assert_eq!(&doc! { "score": { "$meta": "textScore" } }, pipeline[1].get_document("$sort").expect("sort"));
        assert!(pipeline[2].contains_key("$lookup"));
        assert!(pipeline[3].contains_key("$project"));
    }

    #[tokio::test]
    async fn test_should_map_documents() {
        let book = entity();
        let mut stored = to_document(&book);
        assert_eq!(Some(&Bson::ObjectId(book.owner.object_id())), stored.get("owner"));

        stored.insert("ownerProfile", doc! {
            "firstName": "Gil",
            "lastName": "Strang",
            "email": "gil@mit.edu",
        });
        let joined = map_to_joined_book(&stored).expect("should map");
        assert_eq!(book, joined.entity);
        let profile = joined.owner_profile.expect("should have profile");
        assert_eq!("Gil", profile.first_name.as_str());
        assert_eq!("gil@mit.edu", profile.email.as_str());
    }

    #[tokio::test]
    async fn test_should_map_document_without_owner_profile() {
        let book = entity();
        let joined = map_to_joined_book(&to_document(&book)).expect("should map");
        assert!(joined.owner_profile.is_none());
    }

    #[tokio::test]
    async fn test_should_fail_mapping_without_id() {
        assert!(map_to_joined_book(&doc! { "title": "t" }).is_err());
    }
}
