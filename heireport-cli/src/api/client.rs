//! HTTP client for the reporting API

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, trace, warn};
use reqwest::{Method, RequestBuilder};
use serde_json::{Value, json};

use super::operations::{Executor, Operation, OperationResult};
use super::pagination::{ListQuery, Page};
use super::{ApiError, Resource};

/// Bearer-authenticated JSON client
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("heireport/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Client built from the loaded configuration and stored credentials
    pub fn from_config(config: &crate::config::Config) -> Result<Self> {
        Self::new(
            &config.api.base_url,
            config.token(),
            Duration::from_secs(config.api.timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let mut request = self
            .http
            .request(method, url)
            .header("Accept", "application/json")
            .header("X-Request-Id", uuid::Uuid::new_v4().to_string());

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        request
    }

    /// Send a request and decode the JSON body (Null for empty bodies)
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        query: &[(&str, String)],
    ) -> Result<(u16, Value), ApiError> {
        let url = self.url(path);
        let mut request = self.request(method.clone(), &url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let started = Instant::now();
        let response = request.send().await.map_err(|source| ApiError::Network {
            url: url.clone(),
            source,
        })?;
        let status = response.status();
        debug!(
            "{} {} -> {} ({:.0}ms)",
            method,
            url,
            status.as_u16(),
            started.elapsed().as_secs_f64() * 1000.0
        );

        let text = response.text().await.map_err(|source| ApiError::Network {
            url: url.clone(),
            source,
        })?;
        trace!("Response body: {}", text);

        if !status.is_success() {
            return Err(ApiError::from_response(status, &text));
        }

        if text.trim().is_empty() {
            return Ok((status.as_u16(), Value::Null));
        }

        let json = serde_json::from_str(&text).map_err(|e| ApiError::Decode {
            url,
            message: e.to_string(),
        })?;
        Ok((status.as_u16(), json))
    }

    pub async fn get(&self, resource: Resource, id: &str) -> Result<Value, ApiError> {
        let path = format!("{}/{}", resource.path(), id);
        let (_, json) = self.send(Method::GET, &path, None, &[]).await?;
        // Single-record endpoints may wrap the record in "data"
        Ok(match json {
            Value::Object(mut obj) if obj.len() == 1 && obj.contains_key("data") => {
                obj.remove("data").unwrap_or(Value::Null)
            }
            other => other,
        })
    }

    pub async fn list(&self, resource: Resource, query: &ListQuery) -> Result<Page, ApiError> {
        let (_, json) = self
            .send(Method::GET, resource.path(), None, &query.to_params())
            .await?;
        Page::from_json(json, query.page).ok_or_else(|| ApiError::Decode {
            url: self.url(resource.path()),
            message: "expected a list or a {data: [...]} page".to_string(),
        })
    }

    /// Fetch every page of a listing
    pub async fn list_all(
        &self,
        resource: Resource,
        institution_id: Option<&str>,
    ) -> Result<Vec<Value>, ApiError> {
        let mut query = ListQuery {
            per_page: 100,
            institution_id: institution_id.map(str::to_string),
            ..Default::default()
        };
        let mut items = Vec::new();

        loop {
            let page = self.list(resource, &query).await?;
            if !page.is_page(query.page) {
                warn!(
                    "{} returned page {} when page {} was requested; stopping",
                    resource.path(),
                    page.current_page,
                    query.page
                );
                break;
            }
            let has_next = page.has_next();
            items.extend(page.items);
            if !has_next {
                break;
            }
            query.page += 1;
        }

        Ok(items)
    }

    /// Exchange credentials for a bearer token
    pub async fn login(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let body = json!({ "email": email, "password": password });
        let (_, json) = self.send(Method::POST, "login", Some(&body), &[]).await?;

        ["token", "access_token"]
            .iter()
            .find_map(|key| json.get(*key).and_then(Value::as_str))
            .map(str::to_string)
            .ok_or_else(|| ApiError::Decode {
                url: self.url("login"),
                message: "no token in login response".to_string(),
            })
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        self.send(Method::POST, "logout", None, &[]).await?;
        Ok(())
    }

    /// The authenticated user
    pub async fn me(&self) -> Result<Value, ApiError> {
        let (_, json) = self.send(Method::GET, "user", None, &[]).await?;
        Ok(json)
    }
}

#[async_trait]
impl Executor for ApiClient {
    async fn execute(&self, operation: &Operation) -> Result<OperationResult, ApiError> {
        if self.token.is_none() {
            return Err(ApiError::Unauthenticated);
        }

        let body = operation.body();
        let (status, data) = self
            .send(operation.http_method(), &operation.path(), body.as_ref(), &[])
            .await?;
        Ok(OperationResult::new(operation.clone(), status, data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let client =
            ApiClient::new("https://hei.example.gov/api/", None, Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url(), "https://hei.example.gov/api");
        assert_eq!(client.url("/programs"), "https://hei.example.gov/api/programs");
        assert_eq!(client.url("programs/3"), "https://hei.example.gov/api/programs/3");
    }

    #[tokio::test]
    async fn test_execute_without_token_fails_before_sending() {
        // Port 9 (discard) is never contacted: the token check comes first
        let client = ApiClient::new("http://127.0.0.1:9", None, Duration::from_secs(1)).unwrap();
        let op = Operation::create(Resource::Programs, serde_json::json!({}));
        assert!(matches!(
            client.execute(&op).await,
            Err(ApiError::Unauthenticated)
        ));
    }
}
