//! User entity definitions

use rentora_config::MediaConfig;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account record. The login key is `username`, auto-assigned at
/// registration; `email` is the unique identity clients register with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub username: String,
    pub name: String,
    pub avatar: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl User {
    /// Resolve the avatar path reference to an absolute URL, following the
    /// same pattern as property images.
    pub fn avatar_url(&self, media: &MediaConfig) -> Option<String> {
        self.avatar.as_deref().map(|path| media.resolve(path))
    }
}

/// Request for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub name: String,
    pub password_hash: String,
    pub avatar: Option<String>,
}

/// Generate a login username that is never taken from client input.
pub fn generate_username() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("user_{}", &id[..12])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user(avatar: Option<&str>) -> User {
        User {
            id: Uuid::new_v4().to_string(),
            email: "ann@example.com".to_string(),
            username: generate_username(),
            name: "Ann".to_string(),
            avatar: avatar.map(|a| a.to_string()),
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn avatar_url_resolves_against_media_config() {
        let media = MediaConfig::default();
        let user = sample_user(Some("uploads/avatars/ann.png"));

        assert_eq!(
            user.avatar_url(&media).as_deref(),
            Some("http://localhost:8000/media/uploads/avatars/ann.png")
        );
    }

    #[test]
    fn avatar_url_is_none_without_avatar() {
        let media = MediaConfig::default();
        let user = sample_user(None);
        assert!(user.avatar_url(&media).is_none());
    }

    #[test]
    fn generated_usernames_are_unique_and_prefixed() {
        let first = generate_username();
        let second = generate_username();

        assert!(first.starts_with("user_"));
        assert_eq!(first.len(), "user_".len() + 12);
        assert_ne!(first, second);
    }
}
