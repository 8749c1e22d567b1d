//! Links that hand page text to an external chat assistant.
//!
//! The payload travels as a single URL-encoded query parameter. Browsers and
//! servers reject very long URLs, so the payload is cut on a character
//! boundary until the whole link fits in `max_url_len` bytes.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::{form_urlencoded, Url};

pub const DEFAULT_ASSISTANT_URL: &str = "https://chatgpt.com/";
pub const DEFAULT_QUERY_PARAM: &str = "q";
pub const DEFAULT_MAX_URL_LEN: usize = 8_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantEndpoint {
    pub base_url: String,
    pub query_param: String,
    pub max_url_len: usize,
}

impl Default for AssistantEndpoint {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ASSISTANT_URL.to_string(),
            query_param: DEFAULT_QUERY_PARAM.to_string(),
            max_url_len: DEFAULT_MAX_URL_LEN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantLink {
    pub url: String,
    pub truncated: bool,
    /// Number of payload characters carried by the link.
    pub kept_chars: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    InvalidBaseUrl(String),
    /// The endpoint alone already exceeds the length limit.
    NoRoomForPayload { required: usize, max_url_len: usize },
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkError::InvalidBaseUrl(message) => write!(f, "invalid assistant url: {message}"),
            LinkError::NoRoomForPayload {
                required,
                max_url_len,
            } => write!(
                f,
                "assistant url needs {required} bytes before the payload (max {max_url_len})"
            ),
        }
    }
}

impl std::error::Error for LinkError {}

impl AssistantEndpoint {
    pub fn validate(&self) -> Result<Url, LinkError> {
        Url::parse(&self.base_url).map_err(|err| LinkError::InvalidBaseUrl(err.to_string()))
    }

    /// Builds the link for `text`, truncating the payload if needed.
    pub fn compose_link(&self, text: &str) -> Result<AssistantLink, LinkError> {
        let mut url = self.validate()?;

        // `?` or `&`, then `param=`.
        let overhead = url.as_str().len() + 1 + encoded_len(&self.query_param) + 1;
        if overhead > self.max_url_len {
            return Err(LinkError::NoRoomForPayload {
                required: overhead,
                max_url_len: self.max_url_len,
            });
        }
        let budget = self.max_url_len - overhead;

        let mut used = 0;
        let mut cut = text.len();
        let mut kept_chars = 0;
        let mut buf = [0u8; 4];
        for (index, ch) in text.char_indices() {
            let len = encoded_len(ch.encode_utf8(&mut buf));
            if used + len > budget {
                cut = index;
                break;
            }
            used += len;
            kept_chars += 1;
        }

        let payload = &text[..cut];
        url.query_pairs_mut().append_pair(&self.query_param, payload);

        Ok(AssistantLink {
            url: url.into(),
            truncated: cut < text.len(),
            kept_chars,
        })
    }
}

fn encoded_len(text: &str) -> usize {
    form_urlencoded::byte_serialize(text.as_bytes())
        .map(str::len)
        .sum()
}
