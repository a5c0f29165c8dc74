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
    models::domain::Question,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    async fn create(&self, question: Question) -> AppResult<Question>;
    /// Insert a whole batch atomically: either every question lands or none.
    async fn insert_batch(&self, questions: Vec<Question>) -> AppResult<usize>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Question>>;
    async fn list_by_test(&self, test_id: &str) -> AppResult<Vec<Question>>;
    async fn count_by_test(&self, test_id: &str) -> AppResult<u64>;
    async fn update(&self, question: Question) -> AppResult<Question>;
    async fn delete_by_test(&self, test_id: &str) -> AppResult<u64>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoQuestionRepository {
    db: Database,
    collection: Collection<Question>,
}

impl MongoQuestionRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("questions");
        Self {
            db: db.clone(),
            collection,
        }
    }
}

#[async_trait]
impl QuestionRepository for MongoQuestionRepository {
    async fn create(&self, question: Question) -> AppResult<Question> {
        self.collection.insert_one(&question).await?;
        Ok(question)
    }

    async fn insert_batch(&self, questions: Vec<Question>) -> AppResult<usize> {
        if questions.is_empty() {
            return Ok(0);
        }

        let mut session = self.db.client().start_session().await?;
        session.start_transaction().await?;

        for question in &questions {
            if let Err(err) = self
                .collection
                .insert_one(question)
                .session(&mut session)
                .await
            {
                session.abort_transaction().await?;
                return Err(err.into());
            }
        }

        session.commit_transaction().await?;
        Ok(questions.len())
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Question>> {
        let question = self.collection.find_one(doc! { "id": id }).await?;
        Ok(question)
    }

    async fn list_by_test(&self, test_id: &str) -> AppResult<Vec<Question>> {
        let find_options = FindOptions::builder().sort(doc! { "position": 1 }).build();

        let cursor = self
            .collection
            .find(doc! { "test_id": test_id })
            .with_options(find_options)
            .await?;
        let questions: Vec<Question> = cursor.try_collect().await?;
        Ok(questions)
    }

    async fn count_by_test(&self, test_id: &str) -> AppResult<u64> {
        let count = self
            .collection
            .count_documents(doc! { "test_id": test_id })
            .await?;
        Ok(count)
    }

    async fn update(&self, question: Question) -> AppResult<Question> {
        let result = self
            .collection
            .replace_one(doc! { "id": &question.id }, &question)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Question with id '{}' not found",
                question.id
            )));
        }

        Ok(question)
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

        let test_index = IndexModel::builder()
            .keys(doc! { "test_id": 1, "position": 1 })
            .options(IndexOptions::builder().name("test_position".to_string()).build())
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(test_index).await?;
        Ok(())
    }
}
