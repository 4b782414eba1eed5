use tracing::debug;

use crate::{error::AppResult, models::OmdbMovie};

pub struct OmdbClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OmdbClient {
    pub fn new(client: reqwest::Client, api_key: String, base_url: String) -> Self {
        Self { client, api_key, base_url }
    }

    /// Looks a title up by exact name. `Ok(None)` means OMDb answered but had
    /// no match; transport and HTTP status failures come back as errors.
    pub async fn fetch(&self, title: &str) -> AppResult<Option<OmdbMovie>> {
        debug!(title, "querying omdb");

        let resp: OmdbMovie = self
            .client
            .get(&self.base_url)
            .query(&[("apikey", self.api_key.as_str()), ("t", title)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if !resp.is_found() {
            debug!(title, error = resp.error.as_deref().unwrap_or(""), "omdb has no match");
            return Ok(None);
        }

        Ok(Some(resp))
    }
}
