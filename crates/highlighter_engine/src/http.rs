use std::time::Duration;

use async_trait::async_trait;
use ext_logging::ext_debug;
use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::asset::{decode_text, AssetLoader};
use crate::AssetError;

#[derive(Debug, Clone)]
pub struct AssetFetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for AssetFetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 256 * 1024,
        }
    }
}

/// Loads assets relative to a base URL, e.g. an unpacked extension served
/// over HTTP during development.
#[derive(Debug, Clone)]
pub struct HttpAssetLoader {
    base: Url,
    settings: AssetFetchSettings,
    client: reqwest::Client,
}

impl HttpAssetLoader {
    pub fn new(base: Url, settings: AssetFetchSettings) -> Result<Self, AssetError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| AssetError::Network(err.to_string()))?;
        Ok(Self {
            base,
            settings,
            client,
        })
    }

    fn resolve(&self, path: &str) -> Result<Url, AssetError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|err| AssetError::InvalidPath {
                path: path.to_string(),
                message: err.to_string(),
            })
    }

    fn too_large(&self, path: &str) -> AssetError {
        AssetError::TooLarge {
            path: path.to_string(),
            max_bytes: self.settings.max_bytes,
        }
    }
}

#[async_trait(?Send)]
impl AssetLoader for HttpAssetLoader {
    async fn load_text(&self, path: &str) -> Result<String, AssetError> {
        let url = self.resolve(path)?;
        ext_debug!("fetching asset {url}");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| AssetError::Network(err.to_string()))?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Err(AssetError::NotFound(path.to_string()));
        }
        if !status.is_success() {
            return Err(AssetError::HttpStatus {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }
        if response
            .content_length()
            .is_some_and(|len| len > self.settings.max_bytes)
        {
            return Err(self.too_large(path));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|err| AssetError::Network(err.to_string()))?;
            if bytes.len() as u64 + chunk.len() as u64 > self.settings.max_bytes {
                return Err(self.too_large(path));
            }
            bytes.extend_from_slice(&chunk);
        }

        decode_text(path, &bytes, content_type.as_deref())
    }
}
