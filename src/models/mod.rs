// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Label, LabeledExample, ClassificationResult, FeedbackStatus, Recommendation, CorpusStats};
pub use requests::{FeedbackRequest, RecommendRequest};
pub use responses::{FeedbackResponse, RecommendResponse, HealthResponse, ErrorResponse};
