use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime, Document};
use mongodb::Collection;

use super::CareerAdviceRepository;
use crate::database::{MongoDB, CAREER_ADVICE};
use crate::models::{CareerAdvice, CareerAdviceFilter};
use crate::utils::error::AppError;

pub struct MongoCareerAdviceRepository {
    collection: Collection<CareerAdvice>,
}

impl MongoCareerAdviceRepository {
    pub fn new(db: &MongoDB) -> Self {
        Self {
            collection: db.collection::<CareerAdvice>(CAREER_ADVICE),
        }
    }
}

/// Query document for the advice board. `search` is matched literally.
pub(crate) fn advice_query(filter: &CareerAdviceFilter) -> Document {
    let mut query = Document::new();

    if !filter.tags.is_empty() {
        query.insert("tags", doc! { "$in": filter.tags.clone() });
    }
    if let Some(alumni_id) = filter.alumni_id {
        query.insert("alumniId", alumni_id);
    }
    if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
        let pattern = regex::escape(search);
        query.insert(
            "$or",
            vec![
                doc! { "title": { "$regex": pattern.as_str(), "$options": "i" } },
                doc! { "content": { "$regex": pattern.as_str(), "$options": "i" } },
            ],
        );
    }

    query
}

#[async_trait]
impl CareerAdviceRepository for MongoCareerAdviceRepository {
    async fn insert(&self, mut advice: CareerAdvice) -> Result<CareerAdvice, AppError> {
        let result = self.collection.insert_one(&advice).await?;
        advice.id = result.inserted_id.as_object_id();
        Ok(advice)
    }

    async fn find(&self, filter: &CareerAdviceFilter) -> Result<Vec<CareerAdvice>, AppError> {
        let cursor = self
            .collection
            .find(advice_query(filter))
            .sort(doc! { "createdAt": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn like(
        &self,
        id: &ObjectId,
        user_id: &ObjectId,
    ) -> Result<Option<CareerAdvice>, AppError> {
        // Only matches while the user is not yet a liker, so likes stays equal to likedBy.len().
        self.collection
            .update_one(
                doc! { "_id": *id, "likedBy": { "$ne": *user_id } },
                doc! {
                    "$addToSet": { "likedBy": *user_id },
                    "$inc": { "likes": 1 },
                    "$set": { "updatedAt": BsonDateTime::now() },
                },
            )
            .await?;

        Ok(self.collection.find_one(doc! { "_id": *id }).await?)
    }
}
