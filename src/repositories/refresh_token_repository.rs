use async_trait::async_trait;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{db::Database, errors::AppResult, models::domain::RefreshToken};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    async fn create(&self, token: RefreshToken) -> AppResult<RefreshToken>;
    async fn find_by_token_hash(&self, hash: &str) -> AppResult<Option<RefreshToken>>;
    async fn revoke_by_token_hash(&self, hash: &str) -> AppResult<()>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoRefreshTokenRepository {
    collection: Collection<RefreshToken>,
}

impl MongoRefreshTokenRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("refresh_tokens");
        Self { collection }
    }
}

#[async_trait]
impl RefreshTokenRepository for MongoRefreshTokenRepository {
    async fn create(&self, token: RefreshToken) -> AppResult<RefreshToken> {
        self.collection.insert_one(&token).await?;
        Ok(token)
    }

    async fn find_by_token_hash(&self, hash: &str) -> AppResult<Option<RefreshToken>> {
        let token = self
            .collection
            .find_one(doc! { "token_hash": hash })
            .await?;
        Ok(token)
    }

    async fn revoke_by_token_hash(&self, hash: &str) -> AppResult<()> {
        self.collection
            .update_one(
                doc! { "token_hash": hash },
                doc! { "$set": { "revoked": true } },
            )
            .await?;
        Ok(())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let hash_index = IndexModel::builder()
            .keys(doc! { "token_hash": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("token_hash_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(hash_index).await?;
        Ok(())
    }
}
