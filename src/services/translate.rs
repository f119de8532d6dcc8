use reqwest::Client as HttpClient;
use serde::Deserialize;
use std::time::Duration;

use crate::{
    config::Config,
    error::{AppError, AppResult},
};

#[derive(Debug, Deserialize)]
struct YandexResponse {
    #[serde(default)]
    text: Vec<String>,
}

/// Machine translation of user-written text (comments)
///
/// Translation is best effort: whenever the upstream service is unavailable
/// the caller gets its original text back.
#[derive(Clone)]
pub struct Translator {
    http_client: HttpClient,
    api_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl Translator {
    pub fn new(
        http_client: HttpClient,
        api_url: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            http_client,
            api_url,
            api_key,
            timeout,
        }
    }

    pub fn from_config(config: &Config, http_client: HttpClient) -> Self {
        Self::new(
            http_client,
            config.translate_api_url.clone(),
            config.translate_api_key.clone(),
            config.provider_timeout(),
        )
    }

    /// Translates `text` from `lang_from` to `lang_to`, falling back to `text`
    pub async fn translate(&self, text: &str, lang_from: &str, lang_to: &str) -> String {
        match self.request(text, lang_from, lang_to).await {
            Ok(translated) => translated,
            Err(e) => {
                tracing::debug!(error = %e, "Translation failed, returning original text");
                text.to_string()
            }
        }
    }

    async fn request(&self, text: &str, lang_from: &str, lang_to: &str) -> AppResult<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::ExternalApi("No translate API key configured".to_string()))?;

        let lang = format!("{}-{}", lang_from, lang_to);
        let response = self
            .http_client
            .post(&self.api_url)
            .timeout(self.timeout)
            .query(&[("key", api_key), ("lang", lang.as_str())])
            .form(&[("text", text)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApi(format!(
                "Translate API returned status {}",
                response.status()
            )));
        }

        let body: YandexResponse = response.json().await?;
        if body.text.is_empty() {
            return Err(AppError::ExternalApi(
                "Translate API returned no text".to_string(),
            ));
        }

        Ok(body.text.join("\n"))
    }
}
