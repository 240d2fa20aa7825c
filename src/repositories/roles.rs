use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::Collection;

use super::RoleRepository;
use crate::database::{MongoDB, ROLES};
use crate::models::Role;
use crate::utils::error::AppError;

pub struct MongoRoleRepository {
    collection: Collection<Role>,
}

impl MongoRoleRepository {
    pub fn new(db: &MongoDB) -> Self {
        Self {
            collection: db.collection::<Role>(ROLES),
        }
    }
}

#[async_trait]
impl RoleRepository for MongoRoleRepository {
    async fn insert(&self, mut role: Role) -> Result<Role, AppError> {
        let result = self.collection.insert_one(&role).await?;
        role.id = result.inserted_id.as_object_id();
        Ok(role)
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Role>, AppError> {
        Ok(self.collection.find_one(doc! { "_id": *id }).await?)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, AppError> {
        Ok(self.collection.find_one(doc! { "name": name }).await?)
    }

    async fn list(&self) -> Result<Vec<Role>, AppError> {
        let cursor = self.collection.find(doc! {}).sort(doc! { "name": 1 }).await?;
        Ok(cursor.try_collect().await?)
    }
}
