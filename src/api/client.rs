use super::wire::{
    AnalyzeReply, AnalyzeRequest, QueryReply, QueryRequest, decode_analyze_reply,
    decode_query_reply,
};
use crate::config::ApiConfig;
use async_trait::async_trait;
use reqwest::{Client, StatusCode, multipart};

const QUERY_PATH: &str = "api/v1/query";
const ANALYZE_PATH: &str = "api/v1/analyze";

const GENERIC_FAILURE: &str = "Something went wrong while contacting Mediverse.";

// ============================================
// Error Types
// ============================================

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request failed with status {0}")]
    Status(StatusCode),

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("request cancelled")]
    Cancelled,
}

impl ApiError {
    /// Text safe to show in the UI. Transport details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status(status) => format!("Request failed with status {}", status.as_u16()),
            ApiError::Transport(_) | ApiError::Decode(_) | ApiError::Cancelled => {
                GENERIC_FAILURE.to_string()
            }
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// The two calls the UI makes. `HttpApi` is the real transport.
#[async_trait]
pub trait AnalysisApi: Send + Sync {
    async fn query(&self, request: &QueryRequest) -> ApiResult<QueryReply>;

    async fn analyze(&self, request: &AnalyzeRequest) -> ApiResult<AnalyzeReply>;
}

pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        #[allow(unused_mut)]
        let mut builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn read_body(response: reqwest::Response) -> ApiResult<String> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            tracing::warn!(%status, body_len = body.len(), "analysis service returned an error");
            return Err(ApiError::Status(status));
        }
        Ok(body)
    }
}

#[async_trait]
impl AnalysisApi for HttpApi {
    async fn query(&self, request: &QueryRequest) -> ApiResult<QueryReply> {
        let url = self.endpoint(QUERY_PATH);
        tracing::debug!(%url, query_len = request.query.len(), "sending query");

        let response = self.client.post(&url).json(request).send().await?;
        let body = Self::read_body(response).await?;
        decode_query_reply(&body)
    }

    async fn analyze(&self, request: &AnalyzeRequest) -> ApiResult<AnalyzeReply> {
        let url = self.endpoint(ANALYZE_PATH);
        tracing::debug!(
            %url,
            mode = request.mode.as_str(),
            has_image = request.image.is_some(),
            "sending analysis request"
        );

        let mut form = multipart::Form::new()
            .text("query", request.query.clone())
            .text("mode", request.mode.as_str());
        if let Some(image) = &request.image {
            let part = multipart::Part::bytes(image.bytes.clone())
                .file_name(image.file_name.clone())
                .mime_str(&image.mime)?;
            form = form.part("image", part);
        }

        let response = self.client.post(&url).multipart(form).send().await?;
        let body = Self::read_body(response).await?;
        decode_analyze_reply(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_join_cleanly() {
        let api = HttpApi::new(&ApiConfig {
            base_url: "https://api.mediverse.test/".to_string(),
            request_timeout: None,
        })
        .unwrap();
        assert_eq!(
            api.endpoint(QUERY_PATH),
            "https://api.mediverse.test/api/v1/query"
        );
        assert_eq!(
            api.endpoint(ANALYZE_PATH),
            "https://api.mediverse.test/api/v1/analyze"
        );
    }

    #[test]
    fn user_message_hides_decode_details() {
        let decode = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ApiError::from(decode);
        assert_eq!(err.user_message(), GENERIC_FAILURE);

        let err = ApiError::Status(StatusCode::BAD_GATEWAY);
        assert_eq!(err.user_message(), "Request failed with status 502");
    }
}
