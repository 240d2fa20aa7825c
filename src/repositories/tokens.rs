use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime};
use mongodb::Collection;

use super::TokenRepository;
use crate::database::{MongoDB, REFRESH_TOKENS, RESET_TOKENS};
use crate::models::{RefreshToken, ResetToken};
use crate::utils::error::AppError;

pub struct MongoTokenRepository {
    refresh_tokens: Collection<RefreshToken>,
    reset_tokens: Collection<ResetToken>,
}

impl MongoTokenRepository {
    pub fn new(db: &MongoDB) -> Self {
        Self {
            refresh_tokens: db.collection::<RefreshToken>(REFRESH_TOKENS),
            reset_tokens: db.collection::<ResetToken>(RESET_TOKENS),
        }
    }
}

#[async_trait]
impl TokenRepository for MongoTokenRepository {
    async fn upsert_refresh_token(
        &self,
        user_id: &ObjectId,
        token: &str,
        expiry_date: BsonDateTime,
    ) -> Result<(), AppError> {
        self.refresh_tokens
            .update_one(
                doc! { "userId": *user_id },
                doc! { "$set": { "token": token, "expiryDate": expiry_date } },
            )
            .upsert(true)
            .await?;
        Ok(())
    }

    async fn find_valid_refresh_token(
        &self,
        token: &str,
        now: BsonDateTime,
    ) -> Result<Option<RefreshToken>, AppError> {
        Ok(self
            .refresh_tokens
            .find_one(doc! { "token": token, "expiryDate": { "$gte": now } })
            .await?)
    }

    async fn insert_reset_token(&self, token: ResetToken) -> Result<(), AppError> {
        self.reset_tokens.insert_one(&token).await?;
        Ok(())
    }

    async fn take_valid_reset_token(
        &self,
        token: &str,
        now: BsonDateTime,
    ) -> Result<Option<ResetToken>, AppError> {
        Ok(self
            .reset_tokens
            .find_one_and_delete(doc! { "token": token, "expiryDate": { "$gte": now } })
            .await?)
    }
}
