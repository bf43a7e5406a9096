use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{header::USER_AGENT, redirect::Policy, Client, StatusCode};
use std::time::Duration;
use tracing::debug;
use url::Url;

#[async_trait]
pub trait PageSource: Send + Sync {
    /// Human-readable name of the source
    fn name(&self) -> &'static str;

    /// Follows a single redirect hop. A non-redirect response yields `url` unchanged.
    async fn resolve_redirect(&self, url: &str) -> Result<String>;

    /// Fetches the page body. Anything but `200 OK` is an error.
    async fn fetch_page(&self, url: &str) -> Result<String>;
}

pub struct HttpPageSource {
    client: Client,
    no_redirect_client: Client,
    user_agent: String,
}

impl HttpPageSource {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;
        let no_redirect_client = Client::builder()
            .timeout(timeout)
            .redirect(Policy::none())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            no_redirect_client,
            user_agent: user_agent.to_string(),
        })
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn resolve_redirect(&self, url: &str) -> Result<String> {
        let response = self
            .no_redirect_client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await
            .with_context(|| format!("Failed to request {}", url))?;

        let status = response.status();
        if status != StatusCode::FOUND && status != StatusCode::MOVED_PERMANENTLY {
            debug!("No redirect for {} ({})", url, status);
            return Ok(url.to_string());
        }

        let location = response
            .headers()
            .get(reqwest::header::LOCATION)
            .ok_or_else(|| anyhow::anyhow!("Redirect from {} has no location header", url))?
            .to_str()
            .context("Redirect location is not valid text")?;

        // Location may be relative to the request URL
        let resolved = Url::parse(url)
            .and_then(|base| base.join(location))
            .with_context(|| format!("Invalid redirect location: {}", location))?;

        debug!("Resolved {} -> {}", url, resolved);
        Ok(resolved.to_string())
    }

    async fn fetch_page(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", url))?;

        if response.status() != StatusCode::OK {
            return Err(anyhow::anyhow!(
                "Failed to fetch page: HTTP {}",
                response.status()
            ));
        }

        response.text().await.context("Failed to read page body")
    }
}
