use serde::{Deserialize, Serialize};
use crate::models::domain::FeedbackStatus;

/// Response for the feedback endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackResponse {
    pub message: String,
    pub status: FeedbackStatus,
    pub total_examples: usize,
}

/// Response for the recommend endpoint
///
/// `recommend` is 1 (show) or 0 (suppress).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub title: String,
    pub recommend: u8,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub trained: bool,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
