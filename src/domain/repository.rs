use crate::domain::user::{NewUser, User};
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<User>>;
    async fn insert(&self, user: NewUser) -> Result<User>;
    async fn ping(&self) -> Result<()>;
}
