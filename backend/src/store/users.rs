use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::Utc;
use uuid::Uuid;

use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::models::user::User;

use super::{read_json_or_default, write_json_atomic};

type UserMap = BTreeMap<String, User>;

/// Account records kept in a single JSON object keyed by username.
pub struct UserStore {
    path: PathBuf,
}

impl UserStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn load(&self) -> UserMap {
        read_json_or_default(&self.path).await
    }

    async fn save(&self, users: &UserMap) -> AppResult<()> {
        write_json_atomic(&self.path, users).await?;
        Ok(())
    }

    pub async fn get(&self, username: &str) -> Option<User> {
        self.load().await.remove(username)
    }

    /// Inputs are expected to be validated already.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> AppResult<User> {
        let mut users = self.load().await;

        if users.contains_key(username) {
            return Err(AppError::Conflict("Username already exists".into()));
        }
        if users.values().any(|u| u.email.eq_ignore_ascii_case(email)) {
            return Err(AppError::Conflict("Email already registered".into()));
        }

        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: hash_password(password)?,
            created_at: Utc::now(),
            last_login: None,
        };

        users.insert(username.to_string(), user.clone());
        self.save(&users).await?;

        tracing::info!(username = %username, "User registered");
        Ok(user)
    }

    /// Checks credentials and stamps `last_login`. Unknown user and wrong
    /// password are indistinguishable to the caller.
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<User> {
        let mut users = self.load().await;

        let user = users
            .get_mut(username)
            .ok_or(AppError::InvalidCredentials)?;
        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::InvalidCredentials);
        }

        user.last_login = Some(Utc::now());
        let user = user.clone();
        self.save(&users).await?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_register_then_login() {
        let dir = TempDir::new().unwrap();
        let store = UserStore::new(dir.path().join("users.json"));

        store.register("alice", "alice@example.com", "secret1").await.unwrap();
        let user = store.authenticate("alice", "secret1").await.unwrap();
        assert!(user.last_login.is_some());

        let reloaded = UserStore::new(dir.path().join("users.json"));
        assert!(reloaded.get("alice").await.unwrap().last_login.is_some());
    }

    #[tokio::test]
    async fn test_duplicates_conflict() {
        let dir = TempDir::new().unwrap();
        let store = UserStore::new(dir.path().join("users.json"));
        store.register("alice", "alice@example.com", "secret1").await.unwrap();

        let err = store.register("alice", "other@example.com", "secret1").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        let err = store.register("bob", "ALICE@example.com", "secret1").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_bad_credentials_unauthorized() {
        let dir = TempDir::new().unwrap();
        let store = UserStore::new(dir.path().join("users.json"));
        store.register("alice", "alice@example.com", "secret1").await.unwrap();

        assert!(matches!(
            store.authenticate("alice", "nope").await,
            Err(AppError::InvalidCredentials)
        ));
        assert!(matches!(
            store.authenticate("mallory", "secret1").await,
            Err(AppError::InvalidCredentials)
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_parallel_registrations_keep_existing_accounts() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users.json");
        let store = std::sync::Arc::new(UserStore::new(&path));
        store.register("alice", "alice@example.com", "secret1").await.unwrap();

        let mut tasks = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                store
                    .register(&format!("user{i}"), &format!("user{i}@example.com"), "secret1")
                    .await
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        // Racing registrations may drop each other; earlier accounts survive.
        let raw = std::fs::read(&path).unwrap();
        let users: UserMap = serde_json::from_slice(&raw).unwrap();
        assert!(users.contains_key("alice"));
        assert!(users.len() >= 2);
    }

    #[tokio::test]
    async fn test_password_not_stored_in_plain() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users.json");
        let store = UserStore::new(&path);
        store.register("alice", "alice@example.com", "secret1").await.unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("secret1"));
        assert!(raw.contains("$argon2"));
    }
}
