//! HTTP client for a running board server.

use std::time::Duration;

use anyhow::{anyhow, Result};
use reqwest::{StatusCode, Url};
use serde_json::json;
use tracing::debug;

use taskboard_core::validation::{RawProjectInput, ValidationFailure};
use taskboard_core::{MoveOutcome, Project, ProjectStatus};

pub const DEFAULT_URL: &str = "http://127.0.0.1:3030";

#[derive(Clone)]
pub struct BoardClient {
    client: reqwest::Client,
    base_url: Url,
}

impl BoardClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()?;
        let base_url = Url::parse(base_url)
            .map_err(|e| anyhow!("Invalid board URL '{}': {}", base_url, e))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("Invalid board URL '{}'", base_url));
        }
        debug!(base_url = %base_url, "BoardClient initialized");
        Ok(Self { client, base_url })
    }

    /// Append path segments to the base URL, percent-encoding each one.
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("Invalid board URL '{}'", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn list(&self) -> Result<Vec<Project>> {
        let response = self
            .client
            .get(self.url(&["api", "projects"])?)
            .send()
            .await
            .map_err(|e| self.unreachable(e))?;
        Ok(response.error_for_status()?.json().await?)
    }

    /// Submit a project; a rejection by the server's gatekeeper is `Ok(Err(_))`.
    pub async fn add(&self, input: &RawProjectInput) -> Result<Result<Project, ValidationFailure>> {
        let body = json!({
            "title": input.title,
            "description": input.description,
            "people": input.people,
        });
        let response = self
            .client
            .post(self.url(&["api", "projects"])?)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.unreachable(e))?;

        match response.status() {
            StatusCode::UNPROCESSABLE_ENTITY => Ok(Err(response.json().await?)),
            _ => Ok(Ok(response.error_for_status()?.json().await?)),
        }
    }

    /// Move a project; unknown ids come back as `MoveOutcome::NotFound`.
    pub async fn move_project(&self, id: &str, status: ProjectStatus) -> Result<MoveOutcome> {
        let response = self
            .client
            .patch(self.url(&["api", "projects", id])?)
            .json(&json!({ "status": status }))
            .send()
            .await
            .map_err(|e| self.unreachable(e))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(response.json().await?),
            _ => Ok(response.error_for_status()?.json().await?),
        }
    }

    fn unreachable(&self, e: reqwest::Error) -> anyhow::Error {
        anyhow!(
            "Could not reach the board at {} ({}). Is 'taskboard serve' running?",
            self.base_url,
            e
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let client = BoardClient::new("http://localhost:4000/").unwrap();
        assert_eq!(
            client.url(&["api", "projects"]).unwrap().as_str(),
            "http://localhost:4000/api/projects"
        );
    }

    #[test]
    fn test_project_id_is_percent_encoded() {
        let client = BoardClient::new("http://localhost:4000").unwrap();
        let url = client.url(&["api", "projects", "a/b c?d"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:4000/api/projects/a%2Fb%20c%3Fd");
    }

    #[test]
    fn test_base_path_is_kept() {
        let client = BoardClient::new("http://localhost:4000/board/").unwrap();
        assert_eq!(
            client.url(&["api", "projects"]).unwrap().as_str(),
            "http://localhost:4000/board/api/projects"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(BoardClient::new("not a url").is_err());
        assert!(BoardClient::new("mailto:someone@example.com").is_err());
    }
}
