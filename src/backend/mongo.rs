use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, Document};
use mongodb::options::{ClientOptions, FindOneAndUpdateOptions, ReturnDocument};
use mongodb::{Client, Collection};

use crate::backend::UserStore;
use crate::config::StoreConfig;
use crate::model::{User, UserPatch};
use crate::StoreError;

const APP_NAME: &str = "userd";

/// MongoDB-backed user collection.
///
/// The driver owns connection pooling; one `MongoBackend` is shared by the
/// whole process. Cursors are dropped on every return path, which releases
/// them server-side.
pub struct MongoBackend {
    client: Client,
    users: Collection<User>,
    /// Same collection, untyped, for inserts where `_id` is assigned by the store.
    documents: Collection<Document>,
}

impl MongoBackend {
    /// Connect and wait for the deployment to answer a `ping`.
    ///
    /// Fails with [`StoreError::Unavailable`] if no server responds within
    /// `connect_timeout_secs`.
    pub async fn connect(cfg: &StoreConfig) -> Result<Self, StoreError> {
        let mut options = ClientOptions::parse(cfg.uri.as_str()).await?;
        options.connect_timeout = Some(cfg.connect_timeout());
        options.server_selection_timeout = Some(cfg.connect_timeout());
        if options.app_name.is_none() {
            options.app_name = Some(APP_NAME.to_string());
        }

        let client = Client::with_options(options)?;
        let database = client.database(&cfg.database);
        let backend = Self {
            users: database.collection::<User>(&cfg.collection),
            documents: database.collection::<Document>(&cfg.collection),
            client,
        };

        match tokio::time::timeout(cfg.connect_timeout(), backend.ping()).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(StoreError::Unavailable(format!(
                    "no response from MongoDB within {}s",
                    cfg.connect_timeout_secs
                )))
            }
        }

        tracing::info!(
            database = %cfg.database,
            collection = %cfg.collection,
            "Connected to MongoDB"
        );
        Ok(backend)
    }
}

#[async_trait]
impl UserStore for MongoBackend {
    async fn find_all(&self) -> Result<Vec<User>, StoreError> {
        let cursor = self.users.find(None, None).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<User, StoreError> {
        self.users
            .find_one(doc! { "_id": id }, None)
            .await?
            .ok_or_else(|| StoreError::not_found(id))
    }

    async fn insert(&self, fields: UserPatch) -> Result<User, StoreError> {
        let result = self.documents.insert_one(fields.to_document(), None).await?;
        let id = result.inserted_id.as_object_id().ok_or_else(|| {
            StoreError::Backend(format!(
                "store assigned a non-ObjectId _id: {}",
                result.inserted_id
            ))
        })?;
        Ok(fields.into_user(id))
    }

    async fn find_and_update(&self, id: ObjectId, patch: UserPatch) -> Result<User, StoreError> {
        // `$set` with an empty document is rejected by the server.
        if patch.is_empty() {
            return self.find_by_id(id).await;
        }

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        self.users
            .find_one_and_update(
                doc! { "_id": id },
                doc! { "$set": patch.to_document() },
                options,
            )
            .await?
            .ok_or_else(|| StoreError::not_found(id))
    }

    async fn delete(&self, id: ObjectId) -> Result<(), StoreError> {
        let result = self.users.delete_one(doc! { "_id": id }, None).await?;
        if result.deleted_count == 0 {
            return Err(StoreError::not_found(id));
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_deployment_is_unavailable() {
        let cfg = StoreConfig {
            uri: "mongodb://127.0.0.1:1/?directConnection=true".to_string(),
            connect_timeout_secs: 1,
            ..StoreConfig::default()
        };
        let result = MongoBackend::connect(&cfg).await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }

    #[tokio::test]
    async fn malformed_uri_is_a_config_error() {
        let cfg = StoreConfig {
            uri: "localhost:27017".to_string(),
            ..StoreConfig::default()
        };
        let result = MongoBackend::connect(&cfg).await;
        assert!(matches!(result, Err(StoreError::Config(_))));
    }
}
