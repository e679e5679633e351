use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// GitHub account metadata for the credential holder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub login: String,
    pub name: String,
    pub email: String,
    pub avatar_url: String,
    pub bio: String,
    pub company: String,
    pub location: String,
}

/// One repository as fetched from GitHub. Never patched in place: a fresh fetch
/// replaces the whole list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    pub full_name: String,
    pub description: String,
    pub url: String,
    pub stars: u32,
    pub forks: u32,
    pub language: String,
    pub topics: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// `None` for repositories that have never received a push.
    pub pushed_at: Option<DateTime<Utc>>,
    pub is_private: bool,
    pub is_fork: bool,
}

/// The cached unit: everything one fetch returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub profile: Profile,
    pub repositories: Vec<Repository>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_snapshot_json_preserves_every_repository_field() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let snapshot = PortfolioSnapshot {
            profile: Profile {
                id: 42,
                login: "octo".to_string(),
                name: "Octo Cat".to_string(),
                email: String::new(),
                avatar_url: "https://avatars.example/42".to_string(),
                bio: "builds things".to_string(),
                company: String::new(),
                location: "Berlin".to_string(),
            },
            repositories: vec![Repository {
                name: "ripgrep-lite".to_string(),
                full_name: "octo/ripgrep-lite".to_string(),
                description: "Fast search".to_string(),
                url: "https://github.com/octo/ripgrep-lite".to_string(),
                stars: 17,
                forks: 2,
                language: "Rust".to_string(),
                topics: vec!["cli".to_string(), "search".to_string()],
                created_at: ts,
                updated_at: ts,
                pushed_at: None,
                is_private: true,
                is_fork: false,
            }],
        };

        let json = serde_json::to_string(&snapshot).unwrap();
        let recovered: PortfolioSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(recovered, snapshot);
    }
}
