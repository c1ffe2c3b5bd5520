//! GitHub verifier: corroborates claimed projects and languages against public repositories.

use std::collections::BTreeSet;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Url;
use serde::Deserialize;
use tracing::info;

use crate::provider_client::{ProviderClient, ProviderError};
use crate::verification::bounded;
use crate::verification::models::{GitHubRepo, GitHubVerification};

/// Maximum repositories considered per user (one API page).
pub const MAX_REPOSITORIES: usize = 30;
pub const GITHUB_SCORE_CAP: u32 = 500;
const MAX_USERNAME_LEN: usize = 39;

/// A source of repositories for a code-hosting username.
#[async_trait]
pub trait RepositorySource: Send + Sync {
    async fn list_repositories(&self, username: &str) -> Result<Vec<GitHubRepo>, ProviderError>;
}

// ────────────────────────────────────────────────────────────────────────────
// GitHub REST client
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct GitHubRepoResponse {
    name: String,
    description: Option<String>,
    language: Option<String>,
    stargazers_count: u32,
    forks_count: u32,
    updated_at: DateTime<Utc>,
    #[serde(default)]
    topics: Option<Vec<String>>,
}

impl From<GitHubRepoResponse> for GitHubRepo {
    fn from(r: GitHubRepoResponse) -> Self {
        GitHubRepo {
            name: r.name,
            description: r.description,
            language: r.language,
            stars: r.stargazers_count,
            forks: r.forks_count,
            last_updated: r.updated_at,
            topics: r.topics.unwrap_or_default(),
        }
    }
}

pub struct GitHubClient {
    http: ProviderClient,
    base_url: String,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(http: ProviderClient, base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    /// `{base}/users/{username}/repos`, with the username escaped as a single path segment.
    fn repos_url(&self, username: &str) -> Result<Url, ProviderError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ProviderError::InvalidUrl(format!("{}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| ProviderError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(["users", username, "repos"]);
        url.query_pairs_mut()
            .append_pair("per_page", &MAX_REPOSITORIES.to_string())
            .append_pair("sort", "updated");
        Ok(url)
    }
}

#[async_trait]
impl RepositorySource for GitHubClient {
    async fn list_repositories(&self, username: &str) -> Result<Vec<GitHubRepo>, ProviderError> {
        let url = self.repos_url(username)?;
        let auth = self.token.as_ref().map(|t| format!("Bearer {t}"));
        let mut headers = vec![("accept", "application/vnd.github+json")];
        if let Some(auth) = auth.as_deref() {
            headers.push(("authorization", auth));
        }

        let repos: Vec<GitHubRepoResponse> = self.http.get_json(url.as_str(), &headers).await?;
        Ok(repos
            .into_iter()
            .take(MAX_REPOSITORIES)
            .map(GitHubRepo::from)
            .collect())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Verification
// ────────────────────────────────────────────────────────────────────────────

/// Runs GitHub verification. With no username there is nothing to look up and the
/// result is empty; a failed or timed-out fetch keeps the username but zeroes the rest.
pub async fn verify_github(
    source: &dyn RepositorySource,
    username: Option<&str>,
    projects: &[String],
    timeout: Duration,
) -> GitHubVerification {
    let Some(username) = username.filter(|u| !u.trim().is_empty()) else {
        return GitHubVerification::default();
    };

    let Some(repos) = bounded(timeout, "GitHub", source.list_repositories(username)).await else {
        return GitHubVerification {
            username: Some(username.to_string()),
            ..Default::default()
        };
    };

    let languages = extract_languages(&repos);
    let verified_projects = verify_projects_with_repos(projects, &repos);
    let score = github_score(&repos, languages.len(), verified_projects.len());

    info!(
        "GitHub verification for {username}: {} repos, {} languages, {} verified projects, score {score}",
        repos.len(),
        languages.len(),
        verified_projects.len()
    );

    GitHubVerification {
        username: Some(username.to_string()),
        repositories: repos,
        languages_used: languages,
        verified_projects,
        score,
    }
}

/// GitHub login rules: ASCII letters, digits and `-`, not starting with `-`, at most
/// 39 characters.
pub fn is_valid_github_username(username: &str) -> bool {
    !username.is_empty()
        && username.len() <= MAX_USERNAME_LEN
        && !username.starts_with('-')
        && username
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

pub fn extract_languages(repos: &[GitHubRepo]) -> Vec<String> {
    let set: BTreeSet<String> = repos
        .iter()
        .filter_map(|r| r.language.as_deref())
        .map(str::to_lowercase)
        .collect();
    set.into_iter().collect()
}

/// Lower-cases and folds `-`, `_`, `.` and whitespace runs into single spaces so that
/// "DeFi Protocol" and "defi-protocol-app" compare on the same footing.
pub fn normalize_for_match(s: &str) -> String {
    s.to_lowercase()
        .replace(['-', '_', '.'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Two-way containment; empty strings never match.
fn contains_either_way(a: &str, b: &str) -> bool {
    !a.is_empty() && !b.is_empty() && (a.contains(b) || b.contains(a))
}

pub fn project_matches_repo(project: &str, repo: &GitHubRepo) -> bool {
    let project = normalize_for_match(project);
    let name = normalize_for_match(&repo.name);
    let description = normalize_for_match(repo.description.as_deref().unwrap_or(""));
    contains_either_way(&project, &name) || contains_either_way(&project, &description)
}

/// First repository corroborating `project`, if any.
pub fn find_matching_repo<'a>(project: &str, repos: &'a [GitHubRepo]) -> Option<&'a GitHubRepo> {
    repos.iter().find(|r| project_matches_repo(project, r))
}

pub fn verify_projects_with_repos(projects: &[String], repos: &[GitHubRepo]) -> Vec<String> {
    projects
        .iter()
        .filter(|p| find_matching_repo(p, repos).is_some())
        .cloned()
        .collect()
}

/// `10×repos + 2×stars + 3×forks + 15×languages + 25×verified projects`, capped at 500.
pub fn github_score(repos: &[GitHubRepo], language_count: usize, verified_count: usize) -> u32 {
    let stars: u64 = repos.iter().map(|r| u64::from(r.stars)).sum();
    let forks: u64 = repos.iter().map(|r| u64::from(r.forks)).sum();
    let raw = 10 * repos.len() as u64
        + 2 * stars
        + 3 * forks
        + 15 * language_count as u64
        + 25 * verified_count as u64;
    raw.min(u64::from(GITHUB_SCORE_CAP)) as u32
}
