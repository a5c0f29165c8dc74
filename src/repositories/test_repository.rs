use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::doc,
    options::{FindOptions, IndexOptions},
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::Test,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TestRepository: Send + Sync {
    async fn create(&self, test: Test) -> AppResult<Test>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Test>>;
    async fn list_by_author(&self, author_id: &str) -> AppResult<Vec<Test>>;
    async fn delete(&self, id: &str) -> AppResult<()>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoTestRepository {
    collection: Collection<Test>,
}

impl MongoTestRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("tests");
        Self { collection }
    }
}

#[async_trait]
impl TestRepository for MongoTestRepository {
    async fn create(&self, test: Test) -> AppResult<Test> {
        self.collection.insert_one(&test).await?;
        Ok(test)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Test>> {
        let test = self.collection.find_one(doc! { "id": id }).await?;
        Ok(test)
    }

    async fn list_by_author(&self, author_id: &str) -> AppResult<Vec<Test>> {
        let find_options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();

        let cursor = self
            .collection
            .find(doc! { "author_id": author_id })
            .with_options(find_options)
            .await?;
        let tests: Vec<Test> = cursor.try_collect().await?;
        Ok(tests)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!(
                "Test with id '{}' not found",
                id
            )));
        }

        Ok(())
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
