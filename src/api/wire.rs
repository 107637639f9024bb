use super::ApiResult;
use crate::types::{Mode, Source};
use serde::{Deserialize, Deserializer, Serialize};

pub const QUERY_FALLBACK: &str = "No response received.";
pub const ANALYSIS_FALLBACK: &str = "I apologize, but I couldn't analyze that scan. Please try again or consult a healthcare professional.";

const QUERY_LANGUAGE: &str = "en";

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QueryRequest {
    pub query: String,
    pub include_sources: bool,
    pub language: String,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            include_sources: true,
            language: QUERY_LANGUAGE.to_string(),
        }
    }
}

/// Raw file attached to an analysis request.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnalyzeRequest {
    pub query: String,
    pub mode: Mode,
    pub image: Option<ImageUpload>,
}

// Every field is optional on the wire; a wrong type counts as absent.
#[derive(Deserialize, Default)]
struct QueryResponse {
    #[serde(default, deserialize_with = "lenient")]
    response: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    confidence_score: Option<f64>,
}

#[derive(Deserialize, Default)]
struct AnalyzeResponse {
    #[serde(default, deserialize_with = "lenient")]
    response: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    confidence_score: Option<f64>,
    // Decoded element by element so one bad entry does not sink the rest
    #[serde(default, deserialize_with = "lenient")]
    sources: Option<Vec<serde_json::Value>>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

#[derive(Clone, Debug, PartialEq)]
pub struct QueryReply {
    pub text: String,
    pub confidence: f64,
}

impl From<QueryResponse> for QueryReply {
    fn from(raw: QueryResponse) -> Self {
        Self {
            text: raw.response.unwrap_or_else(|| QUERY_FALLBACK.to_string()),
            confidence: raw.confidence_score.unwrap_or(0.0),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnalyzeReply {
    pub text: String,
    pub confidence: Option<f64>,
    pub sources: Vec<Source>,
}

impl From<AnalyzeResponse> for AnalyzeReply {
    fn from(raw: AnalyzeResponse) -> Self {
        Self {
            text: raw.response.unwrap_or_else(|| ANALYSIS_FALLBACK.to_string()),
            confidence: raw.confidence_score,
            sources: raw
                .sources
                .unwrap_or_default()
                .into_iter()
                .filter_map(decode_source)
                .collect(),
        }
    }
}

fn decode_source(value: serde_json::Value) -> Option<Source> {
    match serde_json::from_value(value) {
        Ok(source) => Some(source),
        Err(err) => {
            tracing::debug!(error = %err, "skipping malformed source");
            None
        }
    }
}

/// Decodes a successful `/query` body. Only a body that is not JSON at all is an error.
pub fn decode_query_reply(body: &str) -> ApiResult<QueryReply> {
    let raw: QueryResponse = serde_json::from_str(body)?;
    Ok(raw.into())
}

pub fn decode_analyze_reply(body: &str) -> ApiResult<AnalyzeReply> {
    let raw: AnalyzeResponse = serde_json::from_str(body)?;
    Ok(raw.into())
}
