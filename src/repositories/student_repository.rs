use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::doc,
    options::{FindOptions, IndexOptions},
    Collection, IndexModel,
};

use crate::{db::Database, errors::AppResult, models::domain::Student};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentRepository: Send + Sync {
    async fn create(&self, student: Student) -> AppResult<Student>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Student>>;
    async fn list_by_test(&self, test_id: &str) -> AppResult<Vec<Student>>;
    async fn delete_by_test(&self, test_id: &str) -> AppResult<u64>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoStudentRepository {
    collection: Collection<Student>,
}

impl MongoStudentRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("students");
        Self { collection }
    }
}

#[async_trait]
impl StudentRepository for MongoStudentRepository {
    async fn create(&self, student: Student) -> AppResult<Student> {
        self.collection.insert_one(&student).await?;
        Ok(student)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Student>> {
        let student = self.collection.find_one(doc! { "id": id }).await?;
        Ok(student)
    }

    async fn list_by_test(&self, test_id: &str) -> AppResult<Vec<Student>> {
        // Roster ordering matches the admin review page: by name
        let find_options = FindOptions::builder()
            .sort(doc! { "first_name": 1, "last_name": 1 })
            .build();

        let cursor = self
            .collection
            .find(doc! { "test_id": test_id })
            .with_options(find_options)
            .await?;
        let students: Vec<Student> = cursor.try_collect().await?;
        Ok(students)
    }

    async fn delete_by_test(&self, test_id: &str) -> AppResult<u64> {
        let result = self
            .collection
            .delete_many(doc! { "test_id": test_id })
            .await?;
        Ok(result.deleted_count)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        Ok(())
    }
}
