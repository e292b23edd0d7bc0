use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to record like/dislike feedback for a title
///
/// `liked` travels as the integers 0/1, the way the browser client sends it.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FeedbackRequest {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(range(min = 0, max = 1))]
    pub liked: u8,
}

impl FeedbackRequest {
    pub fn is_liked(&self) -> bool {
        self.liked == 1
    }
}

/// Request to classify a title
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecommendRequest {
    #[validate(length(min = 1))]
    pub title: String,
}
