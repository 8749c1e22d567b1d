use std::collections::HashMap;

use async_trait::async_trait;
use encoding_rs::{Encoding, UTF_8};

use crate::AssetError;

/// Read-only text assets bundled with the extension, addressed by relative path.
#[async_trait(?Send)]
pub trait AssetLoader {
    async fn load_text(&self, path: &str) -> Result<String, AssetError>;
}

#[derive(Debug, Clone, Default)]
pub struct StaticAssetLoader {
    assets: HashMap<String, String>,
}

impl StaticAssetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_asset(mut self, path: impl Into<String>, text: impl Into<String>) -> Self {
        self.assets.insert(path.into(), text.into());
        self
    }
}

#[async_trait(?Send)]
impl AssetLoader for StaticAssetLoader {
    async fn load_text(&self, path: &str) -> Result<String, AssetError> {
        self.assets
            .get(path.trim_start_matches('/'))
            .cloned()
            .ok_or_else(|| AssetError::NotFound(path.to_string()))
    }
}

/// Decode asset bytes using: BOM -> Content-Type charset -> UTF-8.
pub fn decode_text(
    path: &str,
    bytes: &[u8],
    content_type: Option<&str>,
) -> Result<String, AssetError> {
    let encoding = Encoding::for_bom(bytes)
        .map(|(encoding, _)| encoding)
        .or_else(|| {
            content_type
                .and_then(extract_charset)
                .and_then(|label| Encoding::for_label(label.as_bytes()))
        })
        .unwrap_or(UTF_8);

    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(AssetError::Decode {
            path: path.to_string(),
            encoding: encoding.name().to_string(),
        });
    }
    Ok(text.into_owned())
}

fn extract_charset(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .filter_map(|part| {
            let (key, value) = part.split_once('=')?;
            key.trim()
                .eq_ignore_ascii_case("charset")
                .then(|| value.trim_matches([' ', '"', '\''].as_ref()).to_string())
        })
        .next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_respects_charset_header() {
        let text = decode_text("a.txt", b"caf\xe9", Some("text/plain; Charset=\"ISO-8859-1\""))
            .unwrap();
        assert_eq!(text, "café");
    }

    #[test]
    fn decode_strips_utf8_bom() {
        let text = decode_text("a.txt", b"\xEF\xBB\xBFhello", None).unwrap();
        assert_eq!(text, "hello");
    }

    #[test]
    fn invalid_utf8_is_an_error() {
        let err = decode_text("a.txt", b"\xc3\x28", Some("text/plain")).unwrap_err();
        assert!(matches!(err, AssetError::Decode { .. }));
    }
}
