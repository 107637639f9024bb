/// Network boundary for the Mediverse analysis service.
///
/// Two endpoints are used: `POST /api/v1/query` (JSON, Demo Console) and
/// `POST /api/v1/analyze` (multipart, Chat Interface). Responses are decoded
/// leniently so that missing or mistyped optional fields fall back to defaults
/// instead of failing the request.
///
/// # Architecture
///
/// - `wire` - request/response types and field-level fallbacks
/// - `client` - `AnalysisApi` trait and the reqwest-backed `HttpApi`
mod client;
mod wire;

pub use client::{AnalysisApi, ApiError, ApiResult, HttpApi};
pub use wire::{
    ANALYSIS_FALLBACK, AnalyzeReply, AnalyzeRequest, ImageUpload, QUERY_FALLBACK, QueryReply,
    QueryRequest, decode_analyze_reply, decode_query_reply,
};
