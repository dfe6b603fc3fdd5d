use crate::domain::repository::UserRepository;
use crate::domain::user::{NewUser, User, UserView};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Store state embedded into the rendered page as `window.__STATE__`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InitialState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserState>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserState {
    pub users: Vec<UserView>,
}

pub struct UserService<R: UserRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: UserRepository + ?Sized> UserService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<UserView>> {
        let users = self.repository.find_all().await?;
        debug!(count = users.len(), "Mapping users to wire shape");
        Ok(users.into_iter().map(UserView::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn create_placeholder_user(&self) -> Result<User> {
        let user = self.repository.insert(NewUser::placeholder()).await?;
        info!(user_id = %user.id, "Placeholder user inserted");
        Ok(user)
    }

    /// Only the bare root URL preloads users. `url` is the request path
    /// plus query, so `/?ref=x` starts empty like every other route.
    #[instrument(skip(self))]
    pub async fn initial_state(&self, url: &str) -> Result<InitialState> {
        if url != "/" {
            return Ok(InitialState::default());
        }
        let users = self.list_users().await?;
        Ok(InitialState {
            user: Some(UserState { users }),
        })
    }

    pub async fn check_storage(&self) -> Result<()> {
        self.repository.ping().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory::InMemoryUserRepository;
    use crate::domain::user::Gender;

    fn seeded_service() -> UserService<InMemoryUserRepository> {
        let user = User {
            id: "a1".to_string(),
            gender: Gender::Female,
            first: "Rin".to_string(),
            last: "Kato".to_string(),
            email: "rin@example.com".to_string(),
            thumbnail: Some("https://example.com/r.jpg".to_string()),
            version: 0,
        };
        UserService::new(Arc::new(InMemoryUserRepository::with_users(vec![user])))
    }

    #[tokio::test]
    async fn test_list_users_maps_every_field() {
        let users = seeded_service().list_users().await.unwrap();
        assert_eq!(users.len(), 1);
        let user = &users[0];
        assert_eq!(user.gender, Gender::Female);
        assert_eq!(user.name.first, "Rin");
        assert_eq!(user.name.last, "Kato");
        assert_eq!(user.email, "rin@example.com");
        assert_eq!(
            user.picture.thumbnail.as_deref(),
            Some("https://example.com/r.jpg")
        );
    }

    #[tokio::test]
    async fn test_create_placeholder_user_persists() {
        let service = seeded_service();
        let created = service.create_placeholder_user().await.unwrap();
        assert_eq!(created.first, "テスト");

        let users = service.list_users().await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[1].email, "test@gmail.com");
    }

    #[tokio::test]
    async fn test_initial_state_for_root_contains_users() {
        let state = seeded_service().initial_state("/").await.unwrap();
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["user"]["users"][0]["name"]["first"], "Rin");
    }

    #[tokio::test]
    async fn test_initial_state_for_other_paths_is_empty() {
        let service = seeded_service();
        for path in ["/hoge", "/users", "/index.html", "/?utm=x", "/?"] {
            let state = service.initial_state(path).await.unwrap();
            assert_eq!(serde_json::to_string(&state).unwrap(), "{}");
        }
    }
}
