use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime, Document};
use mongodb::options::ReturnDocument;
use mongodb::Collection;

use super::{MentorshipRepository, MENTORSHIP_EXISTS};
use crate::database::{is_duplicate_key, MongoDB, MENTORSHIPS};
use crate::models::{Mentorship, MentorshipStatus};
use crate::utils::error::AppError;

pub struct MongoMentorshipRepository {
    collection: Collection<Mentorship>,
}

impl MongoMentorshipRepository {
    pub fn new(db: &MongoDB) -> Self {
        Self {
            collection: db.collection::<Mentorship>(MENTORSHIPS),
        }
    }
}

pub(crate) fn open_pair_query(student_id: &ObjectId, alumni_id: &ObjectId) -> Document {
    doc! {
        "studentId": *student_id,
        "alumniId": *alumni_id,
        "status": {
            "$in": [MentorshipStatus::Pending.as_str(), MentorshipStatus::Active.as_str()]
        },
    }
}

pub(crate) fn status_update(to: MentorshipStatus) -> Document {
    doc! {
        "$set": {
            "status": to.as_str(),
            "open": to.is_open(),
            "updatedAt": BsonDateTime::now(),
        }
    }
}

#[async_trait]
impl MentorshipRepository for MongoMentorshipRepository {
    async fn insert(&self, mut mentorship: Mentorship) -> Result<Mentorship, AppError> {
        mentorship.open = mentorship.status.is_open();

        match self.collection.insert_one(&mentorship).await {
            Ok(result) => {
                mentorship.id = result.inserted_id.as_object_id();
                Ok(mentorship)
            }
            // The partial unique index on (studentId, alumniId, open) caught a race.
            Err(e) if is_duplicate_key(&e) => Err(AppError::bad_request(MENTORSHIP_EXISTS)),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Mentorship>, AppError> {
        Ok(self.collection.find_one(doc! { "_id": *id }).await?)
    }

    async fn find_open(
        &self,
        student_id: &ObjectId,
        alumni_id: &ObjectId,
    ) -> Result<Option<Mentorship>, AppError> {
        Ok(self
            .collection
            .find_one(open_pair_query(student_id, alumni_id))
            .await?)
    }

    async fn update_status(
        &self,
        id: &ObjectId,
        from: MentorshipStatus,
        to: MentorshipStatus,
    ) -> Result<Option<Mentorship>, AppError> {
        Ok(self
            .collection
            .find_one_and_update(doc! { "_id": *id, "status": from.as_str() }, status_update(to))
            .return_document(ReturnDocument::After)
            .await?)
    }

    async fn find_for_user(&self, user_id: &ObjectId) -> Result<Vec<Mentorship>, AppError> {
        let cursor = self
            .collection
            .find(doc! { "$or": [{ "studentId": *user_id }, { "alumniId": *user_id }] })
            .sort(doc! { "createdAt": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }
}
