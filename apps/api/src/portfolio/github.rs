use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::models::portfolio::{Profile, Repository};

const GITHUB_API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("folio-api/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
/// Up to 100 most recently updated repositories, newest first.
const REPOS_QUERY: &str = "/user/repos?per_page=100&sort=updated&direction=desc";

/// Errors returned by the GitHub REST API client. Never retried locally.
#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GitHub API returned status {status}")]
    Status { status: u16 },

    #[error("Malformed GitHub payload: {0}")]
    Payload(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct GitHubProfile {
    id: i64,
    login: String,
    name: Option<String>,
    email: Option<String>,
    avatar_url: Option<String>,
    bio: Option<String>,
    company: Option<String>,
    location: Option<String>,
}

impl From<GitHubProfile> for Profile {
    fn from(p: GitHubProfile) -> Self {
        Profile {
            id: p.id,
            login: p.login,
            name: p.name.unwrap_or_default(),
            email: p.email.unwrap_or_default(),
            avatar_url: p.avatar_url.unwrap_or_default(),
            bio: p.bio.unwrap_or_default(),
            company: p.company.unwrap_or_default(),
            location: p.location.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GitHubRepository {
    name: String,
    full_name: String,
    description: Option<String>,
    html_url: String,
    stargazers_count: u32,
    forks_count: u32,
    language: Option<String>,
    #[serde(default)]
    topics: Vec<String>,
    private: bool,
    fork: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    pushed_at: Option<DateTime<Utc>>,
}

impl From<GitHubRepository> for Repository {
    fn from(r: GitHubRepository) -> Self {
        Repository {
            name: r.name,
            full_name: r.full_name,
            description: r.description.unwrap_or_default(),
            url: r.html_url,
            stars: r.stargazers_count,
            forks: r.forks_count,
            language: r.language.unwrap_or_default(),
            topics: r.topics,
            created_at: r.created_at,
            updated_at: r.updated_at,
            pushed_at: r.pushed_at,
            is_private: r.private,
            is_fork: r.fork,
        }
    }
}

/// Thin client over the two GitHub endpoints the pipeline consumes.
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    base_url: String,
}

impl GitHubClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, GitHubError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub async fn get_profile(&self, token: &str) -> Result<Profile, GitHubError> {
        let profile: GitHubProfile = self.get_json("/user", token).await?;
        Ok(profile.into())
    }

    pub async fn get_repositories(&self, token: &str) -> Result<Vec<Repository>, GitHubError> {
        let repos: Vec<GitHubRepository> = self.get_json(REPOS_QUERY, token).await?;
        Ok(repos.into_iter().map(Repository::from).collect())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, token: &str) -> Result<T, GitHubError> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .bearer_auth(token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(GitHubError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        debug!("GitHub {} returned {} bytes", path, body.len());
        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use mockito::Matcher;

    pub(crate) const PROFILE_JSON: &str = r#"{
        "id": 583231,
        "login": "octocat",
        "name": "The Octocat",
        "email": null,
        "avatar_url": "https://avatars.githubusercontent.com/u/583231",
        "bio": null,
        "company": "@github",
        "location": "San Francisco"
    }"#;

    pub(crate) const REPOS_JSON: &str = r#"[
        {
            "name": "hello-world",
            "full_name": "octocat/hello-world",
            "description": "My first repository",
            "html_url": "https://github.com/octocat/hello-world",
            "stargazers_count": 80,
            "forks_count": 9,
            "language": "Go",
            "topics": ["cli", "demo"],
            "private": false,
            "fork": false,
            "created_at": "2020-01-26T19:01:12Z",
            "updated_at": "2024-01-26T19:14:43Z",
            "pushed_at": "2024-01-26T19:06:43Z"
        },
        {
            "name": "empty",
            "full_name": "octocat/empty",
            "description": null,
            "html_url": "https://github.com/octocat/empty",
            "stargazers_count": 0,
            "forks_count": 0,
            "language": null,
            "private": true,
            "fork": true,
            "created_at": "2021-05-01T00:00:00Z",
            "updated_at": "2021-05-01T00:00:00Z",
            "pushed_at": null
        }
    ]"#;

    #[tokio::test]
    async fn test_profile_nulls_become_empty_strings() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/user")
            .match_header("authorization", "Bearer gho_token")
            .match_header("x-github-api-version", GITHUB_API_VERSION)
            .with_status(200)
            .with_body(PROFILE_JSON)
            .create_async()
            .await;

        let client = GitHubClient::new(server.url()).unwrap();
        let profile = client.get_profile("gho_token").await.unwrap();

        assert_eq!(profile.login, "octocat");
        assert_eq!(profile.email, "");
        assert_eq!(profile.company, "@github");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_repositories_request_and_mapping() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/user/repos")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("per_page".into(), "100".into()),
                Matcher::UrlEncoded("sort".into(), "updated".into()),
                Matcher::UrlEncoded("direction".into(), "desc".into()),
            ]))
            .with_status(200)
            .with_body(REPOS_JSON)
            .create_async()
            .await;

        let client = GitHubClient::new(server.url()).unwrap();
        let repos = client.get_repositories("gho_token").await.unwrap();

        assert_eq!(repos.len(), 2);
        assert_eq!(repos[0].stars, 80);
        assert_eq!(repos[0].topics, vec!["cli", "demo"]);
        assert_eq!(repos[1].description, "");
        assert_eq!(repos[1].language, "");
        assert!(repos[1].topics.is_empty());
        assert!(repos[1].pushed_at.is_none());
        assert!(repos[1].is_fork && repos[1].is_private);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/user")
            .with_status(401)
            .with_body(r#"{"message":"Bad credentials"}"#)
            .create_async()
            .await;

        let client = GitHubClient::new(server.url()).unwrap();
        let err = client.get_profile("expired").await.unwrap_err();
        assert!(matches!(err, GitHubError::Status { status: 401 }));
    }

    #[tokio::test]
    async fn test_malformed_payload_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/user")
            .with_status(200)
            .with_body("{\"id\": \"not-a-number\"}")
            .create_async()
            .await;

        let client = GitHubClient::new(server.url()).unwrap();
        let err = client.get_profile("tok").await.unwrap_err();
        assert!(matches!(err, GitHubError::Payload(_)));
    }
}
