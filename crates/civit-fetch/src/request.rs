use std::path::{Component, Path};

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::{FetchError, ModelType};

const TOKEN_PARAM: &str = "token";

/// A model to fetch: where it lives remotely, what to call it locally and
/// which category directory it belongs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRequest {
    link: Url,
    model_name: String,
    model_type: ModelType,
}

/// Labeled input shape: `{ "link": ..., "model_name": ..., "model_type": ... }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRecord {
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub model_type: Option<String>,
}

/// Positional input shape: `(link, model_name, model_type)`
pub type ModelTriple = (String, String, String);

/// Either accepted input shape, as found in a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawModelRequest {
    Triple(ModelTriple),
    Record(ModelRecord),
}

impl ModelRequest {
    /// Build a request from already-typed parts.
    pub fn new(
        link: &str,
        model_name: &str,
        model_type: ModelType,
    ) -> Result<Self, FetchError> {
        let link = parse_link(link)?;
        validate_model_name(model_name)?;

        Ok(Self {
            link,
            model_name: model_name.to_string(),
            model_type,
        })
    }

    /// Build a request from the labeled shape. Every field is required.
    pub fn from_record(record: ModelRecord) -> Result<Self, FetchError> {
        let link = required(record.link, "link")?;
        let model_name = required(record.model_name, "model_name")?;
        let model_type = required(record.model_type, "model_type")?;

        Self::from_parts(&link, &model_name, &model_type)
    }

    /// Build a request from the positional shape.
    pub fn from_triple((link, model_name, model_type): ModelTriple) -> Result<Self, FetchError> {
        Self::from_parts(&link, &model_name, &model_type)
    }

    fn from_parts(link: &str, model_name: &str, model_type: &str) -> Result<Self, FetchError> {
        let model_type = ModelType::parse(model_type)?;
        Self::new(link, model_name, model_type)
    }

    pub fn link(&self) -> &Url {
        &self.link
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn model_type(&self) -> ModelType {
        self.model_type
    }

    /// The link with `token=<token>` appended, keeping any existing query.
    pub fn download_url(&self, token: &str) -> Url {
        let mut url = self.link.clone();
        url.query_pairs_mut().append_pair(TOKEN_PARAM, token);
        url
    }

    /// Same as [`Self::download_url`] but safe to log.
    pub(crate) fn redacted_url(&self) -> Url {
        self.download_url("***")
    }
}

impl TryFrom<RawModelRequest> for ModelRequest {
    type Error = FetchError;

    fn try_from(raw: RawModelRequest) -> Result<Self, Self::Error> {
        match raw {
            RawModelRequest::Triple(triple) => Self::from_triple(triple),
            RawModelRequest::Record(record) => Self::from_record(record),
        }
    }
}

/// Parse a JSON manifest: an array whose entries are records or triples.
///
/// The first bad entry fails the whole manifest.
pub fn parse_manifest(json: &str) -> Result<Vec<ModelRequest>, FetchError> {
    let entries: Vec<serde_json::Value> = serde_json::from_str(json)
        .map_err(|e| FetchError::InvalidInput(format!("manifest is not a JSON array: {}", e)))?;

    entries
        .into_iter()
        .enumerate()
        .map(|(idx, entry)| {
            let raw: RawModelRequest = serde_json::from_value(entry).map_err(|_| {
                FetchError::InvalidInput(format!(
                    "entry {}: expected {{link, model_name, model_type}} or [link, model_name, model_type]",
                    idx
                ))
            })?;

            ModelRequest::try_from(raw).map_err(|e| match e {
                FetchError::InvalidInput(msg) => {
                    FetchError::InvalidInput(format!("entry {}: {}", idx, msg))
                }
                other => other,
            })
        })
        .collect()
}

fn required(value: Option<String>, field: &str) -> Result<String, FetchError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(FetchError::InvalidInput(format!(
            "missing required field '{}'",
            field
        ))),
    }
}

fn parse_link(link: &str) -> Result<Url, FetchError> {
    if link.trim().is_empty() {
        return Err(FetchError::InvalidInput("link is empty".to_string()));
    }

    let url = Url::parse(link)
        .map_err(|e| FetchError::InvalidInput(format!("link '{}' is not a URL: {}", link, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(FetchError::InvalidInput(format!(
            "link must be http or https, got '{}'",
            scheme
        ))),
    }
}

/// The file name must stay inside its category directory.
fn validate_model_name(model_name: &str) -> Result<(), FetchError> {
    let mut components = Path::new(model_name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(name)), None) if name == model_name => Ok(()),
        _ => Err(FetchError::InvalidInput(format!(
            "model_name '{}' must be a plain file name",
            model_name
        ))),
    }
}
