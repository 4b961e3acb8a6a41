//! JSON request body of the conversion endpoint.

use std::collections::BTreeMap;

use ark_ingest::InputSource;
use serde::Deserialize;

use crate::pipeline::PipelineOptions;
use crate::server::error::ApiError;

/// Body of `POST /` and `POST /convert`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertRequest {
    pub detail: DocumentSource,
    #[serde(alias = "sap")]
    pub summary: DocumentSource,
    #[serde(default)]
    pub extracted_at: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
}

/// One document: inline `csv` text or a `url` with optional headers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentSource {
    #[serde(default)]
    pub csv: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl ConvertRequest {
    /// Parse a request body, keeping the full error chain for the response.
    pub fn from_json(body: &[u8]) -> Result<Self, ApiError> {
        serde_json::from_slice(body).map_err(|err| {
            let mut trace = vec![err.to_string()];
            if err.line() > 0 {
                trace.push(format!(
                    "{:?} error at line {} column {}",
                    err.classify(),
                    err.line(),
                    err.column()
                ));
            }
            ApiError::malformed(err.to_string(), trace)
        })
    }

    /// Input sources for the detail and summary documents.
    pub fn sources(&self) -> Result<(InputSource, InputSource), ApiError> {
        Ok((
            self.detail.to_input("detail")?,
            self.summary.to_input("summary")?,
        ))
    }

    pub fn options(&self) -> PipelineOptions {
        PipelineOptions {
            extracted_at: self.extracted_at.clone(),
            file_name: self.file_name.clone(),
        }
    }
}

impl DocumentSource {
    fn to_input(&self, field: &str) -> Result<InputSource, ApiError> {
        match (&self.csv, &self.url) {
            (Some(csv), None) => Ok(InputSource::inline(csv.as_str())),
            (None, Some(url)) => {
                let headers = self
                    .headers
                    .iter()
                    .map(|(name, value)| (name.clone(), value.clone()))
                    .collect();
                InputSource::remote(url, headers).map_err(|err| {
                    ApiError::malformed(
                        format!("'{field}' has an unusable url"),
                        vec![err.to_string()],
                    )
                })
            }
            (Some(_), Some(_)) => Err(ApiError::malformed(
                format!("'{field}' must give either csv or url, not both"),
                Vec::new(),
            )),
            (None, None) => Err(ApiError::malformed(
                format!("'{field}' must give csv or url"),
                Vec::new(),
            )),
        }
    }
}
