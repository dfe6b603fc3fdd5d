use crate::domain::error::DomainError;
use crate::domain::repository::UserRepository;
use crate::domain::user::{Gender, NewUser, User};
use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::bson::oid::ObjectId;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument};

pub const USERS_COLLECTION: &str = "users";
const FALLBACK_DATABASE: &str = "typescript-react-template";

/// Document layout of the `users` collection. New documents are written
/// with version key `__v: 0`; other unknown keys are ignored on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    gender: Gender,
    first: String,
    last: String,
    email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    thumbnail: Option<String>,
    #[serde(rename = "__v", default)]
    version: i32,
}

impl From<NewUser> for UserDocument {
    fn from(user: NewUser) -> Self {
        UserDocument {
            id: None,
            gender: user.gender,
            first: user.first,
            last: user.last,
            email: user.email,
            thumbnail: user.thumbnail,
            version: 0,
        }
    }
}

impl TryFrom<UserDocument> for User {
    type Error = DomainError;

    fn try_from(document: UserDocument) -> Result<Self, Self::Error> {
        let id = document
            .id
            .ok_or_else(|| DomainError::InvalidRecord("user document without _id".to_string()))?;
        Ok(User {
            id: id.to_hex(),
            gender: document.gender,
            first: document.first,
            last: document.last,
            email: document.email,
            thumbnail: document.thumbnail,
            version: document.version,
        })
    }
}

#[derive(Clone)]
pub struct MongoUserRepository {
    database: Database,
    users: Collection<UserDocument>,
}

impl MongoUserRepository {
    /// Connects and verifies the server answers a ping.
    ///
    /// The database is `database` when given, else the one named in the
    /// URI path, else `typescript-react-template`.
    pub async fn connect(uri: &str, database: Option<&str>) -> Result<Self> {
        info!(uri = %uri, "Connecting to MongoDB");
        let mut options = ClientOptions::parse(uri)
            .await
            .with_context(|| format!("parse MongoDB URI {}", uri))?;
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
        options.server_selection_timeout = Some(Duration::from_secs(5));

        let database_name = database
            .map(str::to_string)
            .or_else(|| options.default_database.clone())
            .unwrap_or_else(|| FALLBACK_DATABASE.to_string());

        let client = Client::with_options(options)?;
        let repository = Self::from_database(client.database(&database_name));
        repository
            .ping()
            .await
            .with_context(|| format!("reach MongoDB database {}", database_name))?;

        info!(database = %database_name, "Connected to MongoDB");
        Ok(repository)
    }

    pub fn from_database(database: Database) -> Self {
        let users = database.collection::<UserDocument>(USERS_COLLECTION);
        Self { database, users }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<User>> {
        let documents: Vec<UserDocument> = self
            .users
            .find(doc! {})
            .await?
            .try_collect()
            .await
            .context("read users collection")?;
        debug!(count = documents.len(), "Users read from MongoDB");

        let users = documents
            .into_iter()
            .map(User::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    #[instrument(skip(self), fields(email = %user.email))]
    async fn insert(&self, user: NewUser) -> Result<User> {
        let mut document = UserDocument::from(user);
        let result = self
            .users
            .insert_one(&document)
            .await
            .context("insert user document")?;
        let id = result.inserted_id.as_object_id().ok_or_else(|| {
            DomainError::InvalidRecord(format!(
                "unexpected inserted id {}",
                result.inserted_id
            ))
        })?;
        document.id = Some(id);
        debug!(user_id = %id, "User saved to MongoDB");
        Ok(User::try_from(document)?)
    }

    async fn ping(&self) -> Result<()> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| DomainError::StorageUnavailable(e.to_string()))?;
        Ok(())
    }
}
