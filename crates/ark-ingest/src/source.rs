//! Input acquisition: inline text or a remote location.

use std::time::Duration;

use encoding_rs::{Encoding, WINDOWS_1252};
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, info};
use url::Url;

use crate::error::{IngestError, Result};

/// Where the text of one document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// Text supplied directly with the request.
    Inline(String),
    /// An http(s) location fetched with optional request headers.
    Remote {
        url: Url,
        headers: Vec<(String, String)>,
    },
}

impl InputSource {
    pub fn inline(text: impl Into<String>) -> Self {
        InputSource::Inline(text.into())
    }

    /// Validates the location; only http and https are accepted.
    pub fn remote(location: &str, headers: Vec<(String, String)>) -> Result<Self> {
        let url = Url::parse(location.trim()).map_err(|source| IngestError::InvalidUrl {
            url: location.to_string(),
            source,
        })?;
        match url.scheme() {
            "http" | "https" => Ok(InputSource::Remote { url, headers }),
            other => Err(IngestError::UnsupportedScheme {
                url: location.to_string(),
                scheme: other.to_string(),
            }),
        }
    }

    /// Short description for logs.
    pub fn describe(&self) -> String {
        match self {
            InputSource::Inline(text) => format!("inline ({} bytes)", text.len()),
            InputSource::Remote { url, .. } => url.to_string(),
        }
    }
}

/// Fetches input text, bounded by a per-request timeout.
#[derive(Debug, Clone)]
pub struct SourceFetcher {
    client: Client,
}

impl SourceFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(IngestError::Client)?;
        Ok(Self { client })
    }

    /// Acquire the text of a source. Inline text is returned as given.
    pub async fn fetch(&self, source: &InputSource) -> Result<String> {
        match source {
            InputSource::Inline(text) => Ok(text.clone()),
            InputSource::Remote { url, headers } => self.fetch_remote(url, headers).await,
        }
    }

    async fn fetch_remote(&self, url: &Url, headers: &[(String, String)]) -> Result<String> {
        let header_map = build_headers(headers)?;
        debug!(url = %url, headers = header_map.len(), "fetching source");

        let response = self
            .client
            .get(url.clone())
            .headers(header_map)
            .send()
            .await
            .map_err(|err| request_error(url, err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(IngestError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| request_error(url, err))?;
        info!(url = %url, bytes = bytes.len(), "fetched source");
        Ok(decode_text(&bytes))
    }
}

fn request_error(url: &Url, err: reqwest::Error) -> IngestError {
    if err.is_timeout() {
        IngestError::Timeout {
            url: url.to_string(),
        }
    } else {
        IngestError::Fetch {
            url: url.to_string(),
            source: err,
        }
    }
}

fn build_headers(headers: &[(String, String)]) -> Result<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|err| IngestError::InvalidHeader {
                name: name.clone(),
                reason: err.to_string(),
            })?;
        let header_value = HeaderValue::from_str(value).map_err(|err| IngestError::InvalidHeader {
            name: name.clone(),
            reason: err.to_string(),
        })?;
        map.append(header_name, header_value);
    }
    Ok(map)
}

/// Decode fetched bytes: BOM first, then UTF-8, then Windows-1252.
///
/// Exports opened and re-saved on Windows are commonly 1252-encoded, so
/// anything that is not valid UTF-8 is read that way instead of failing.
pub fn decode_text(bytes: &[u8]) -> String {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return text.into_owned();
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            debug!("source is not UTF-8, decoding as Windows-1252");
            let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
            text.into_owned()
        }
    }
}
