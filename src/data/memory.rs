use crate::domain::repository::UserRepository;
use crate::domain::user::{NewUser, User};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, trace};
use uuid::Uuid;

#[derive(Clone)]
pub struct InMemoryUserRepository {
    storage: Arc<RwLock<Vec<User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::with_users(Vec::new())
    }

    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            storage: Arc::new(RwLock::new(users)),
        }
    }

    // 24 hex chars, the same width as an ObjectId.
    fn next_id() -> String {
        let mut id = Uuid::new_v4().simple().to_string();
        id.truncate(24);
        id
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<User>> {
        trace!("Acquiring read lock for user storage");
        let storage = self.storage.read().await;
        debug!(count = storage.len(), "Users read from memory storage");
        Ok(storage.clone())
    }

    #[instrument(skip(self), fields(email = %user.email))]
    async fn insert(&self, user: NewUser) -> Result<User> {
        let user = user.into_user(Self::next_id());
        trace!("Acquiring write lock for user storage");
        let mut storage = self.storage.write().await;
        storage.push(user.clone());
        debug!(user_id = %user.id, "User saved to memory storage");
        Ok(user)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::Gender;

    fn new_user(first: &str) -> NewUser {
        NewUser {
            gender: Gender::Female,
            first: first.to_string(),
            last: "Tanaka".to_string(),
            email: format!("{}@example.com", first.to_lowercase()),
            thumbnail: None,
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_keeps_fields() {
        let repo = InMemoryUserRepository::new();
        let user = repo.insert(new_user("Yui")).await.unwrap();

        assert_eq!(user.id.len(), 24);
        assert!(user.id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(user.first, "Yui");
        assert_eq!(user.email, "yui@example.com");
    }

    #[tokio::test]
    async fn test_find_all_empty() {
        let repo = InMemoryUserRepository::new();
        assert!(repo.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_all_preserves_insertion_order() {
        let repo = InMemoryUserRepository::new();
        for name in ["Aoi", "Ren", "Sora"] {
            repo.insert(new_user(name)).await.unwrap();
        }

        let firsts: Vec<String> = repo
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.first)
            .collect();
        assert_eq!(firsts, vec!["Aoi", "Ren", "Sora"]);
    }

    #[tokio::test]
    async fn test_inserted_ids_are_unique() {
        let repo = InMemoryUserRepository::new();
        let a = repo.insert(new_user("A")).await.unwrap();
        let b = repo.insert(new_user("A")).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(repo.find_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_with_users_seeds_storage() {
        let seeded = new_user("Kai").into_user("seed-1".to_string());
        let repo = InMemoryUserRepository::with_users(vec![seeded.clone()]);
        assert_eq!(repo.find_all().await.unwrap(), vec![seeded]);
    }

    #[tokio::test]
    async fn test_concurrent_inserts() {
        let repo = InMemoryUserRepository::new();

        let handles: Vec<_> = (0..10)
            .map(|i| {
                let repo_clone = repo.clone();
                tokio::spawn(async move { repo_clone.insert(new_user(&format!("U{}", i))).await })
            })
            .collect();

        for handle in handles {
            assert!(handle.await.unwrap().is_ok());
        }
        assert_eq!(repo.find_all().await.unwrap().len(), 10);
    }
}
