use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::doc,
    options::{FindOptions, IndexOptions},
    Collection, IndexModel,
};

use crate::{db::Database, errors::AppResult, models::domain::TestResult};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResultRepository: Send + Sync {
    async fn create(&self, result: TestResult) -> AppResult<TestResult>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<TestResult>>;
    async fn find_by_student_and_test(
        &self,
        student_id: &str,
        test_id: &str,
    ) -> AppResult<Option<TestResult>>;
    async fn list_by_test(&self, test_id: &str) -> AppResult<Vec<TestResult>>;
    async fn delete_by_test(&self, test_id: &str) -> AppResult<u64>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoResultRepository {
    collection: Collection<TestResult>,
}

impl MongoResultRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("results");
        Self { collection }
    }
}

#[async_trait]
impl ResultRepository for MongoResultRepository {
    async fn create(&self, result: TestResult) -> AppResult<TestResult> {
        self.collection.insert_one(&result).await?;
        Ok(result)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<TestResult>> {
        let result = self.collection.find_one(doc! { "id": id }).await?;
        Ok(result)
    }

    async fn find_by_student_and_test(
        &self,
        student_id: &str,
        test_id: &str,
    ) -> AppResult<Option<TestResult>> {
        let result = self
            .collection
            .find_one(doc! { "student_id": student_id, "test_id": test_id })
            .await?;
        Ok(result)
    }

    async fn list_by_test(&self, test_id: &str) -> AppResult<Vec<TestResult>> {
        let find_options = FindOptions::builder()
            .sort(doc! { "submitted_at": -1 })
            .build();

        let cursor = self
            .collection
            .find(doc! { "test_id": test_id })
            .with_options(find_options)
            .await?;
        let results: Vec<TestResult> = cursor.try_collect().await?;
        Ok(results)
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

        // One graded submission per student per test
        let student_test_index = IndexModel::builder()
            .keys(doc! { "student_id": 1, "test_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("student_test_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(student_test_index).await?;
        Ok(())
    }
}
