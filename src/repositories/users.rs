use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime, Document};
use mongodb::options::ReturnDocument;
use mongodb::Collection;

use super::{UserRepository, EMAIL_IN_USE};
use crate::database::{is_duplicate_key, MongoDB, USERS};
use crate::models::{AlumniFilter, AlumniProfile, Pagination, User, UserType};
use crate::utils::error::AppError;

pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &MongoDB) -> Self {
        Self {
            collection: db.collection::<User>(USERS),
        }
    }
}

/// Query document for the alumni directory.
pub(crate) fn alumni_query(filter: &AlumniFilter) -> Document {
    let mut query = doc! { "userType": UserType::Alumni.as_str() };

    if let Some(field) = &filter.field {
        query.insert("field", field.as_str());
    }
    if !filter.expertise_areas.is_empty() {
        query.insert("expertiseAreas", doc! { "$in": filter.expertise_areas.clone() });
    }
    if let Some(year) = filter.graduation_year {
        query.insert("graduationYear", year);
    }

    query
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>, AppError> {
        Ok(self.collection.find_one(doc! { "_id": *id }).await?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.collection.find_one(doc! { "email": email }).await?)
    }

    async fn find_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<User>, AppError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let cursor = self.collection.find(doc! { "_id": { "$in": ids.to_vec() } }).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn insert(&self, mut user: User) -> Result<User, AppError> {
        let now = BsonDateTime::now();
        user.created_at = Some(now);
        user.updated_at = Some(now);

        match self.collection.insert_one(&user).await {
            Ok(result) => {
                user.id = result.inserted_id.as_object_id();
                Ok(user)
            }
            Err(e) if is_duplicate_key(&e) => Err(AppError::bad_request(EMAIL_IN_USE)),
            Err(e) => Err(e.into()),
        }
    }

    async fn update_password(&self, id: &ObjectId, password_hash: &str) -> Result<bool, AppError> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": *id },
                doc! { "$set": { "password": password_hash, "updatedAt": BsonDateTime::now() } },
            )
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn promote_to_alumni(
        &self,
        id: &ObjectId,
        profile: &AlumniProfile,
    ) -> Result<Option<User>, AppError> {
        let update = doc! {
            "$set": {
                "userType": UserType::Alumni.as_str(),
                "graduationYear": profile.graduation_year,
                "field": profile.field.as_str(),
                "expertiseAreas": profile.expertise_areas.clone(),
                "currentPosition": profile.current_position.as_str(),
                "company": profile.company.as_str(),
                "experience": profile.experience.as_str(),
                "updatedAt": BsonDateTime::now(),
            }
        };

        Ok(self
            .collection
            .find_one_and_update(doc! { "_id": *id }, update)
            .return_document(ReturnDocument::After)
            .await?)
    }

    async fn find_alumni(
        &self,
        filter: &AlumniFilter,
        page: Pagination,
    ) -> Result<Vec<User>, AppError> {
        let mut find = self
            .collection
            .find(alumni_query(filter))
            .sort(doc! { "graduationYear": -1 })
            .skip(page.skip);
        if let Some(limit) = page.limit {
            find = find.limit(limit);
        }

        let cursor = find.await?;
        Ok(cursor.try_collect().await?)
    }

    async fn count_alumni(&self, filter: &AlumniFilter) -> Result<u64, AppError> {
        Ok(self.collection.count_documents(alumni_query(filter)).await?)
    }
}
