use serde::{Deserialize, Deserializer, Serialize};

/// The two feedback classes a title can belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Liked,
    Disliked,
}

impl Label {
    pub fn from_liked(liked: bool) -> Self {
        if liked {
            Label::Liked
        } else {
            Label::Disliked
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Liked => "liked",
            Label::Disliked => "disliked",
        }
    }
}

/// A single piece of user feedback, keyed by its exact title
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledExample {
    pub title: String,
    #[serde(deserialize_with = "bool_or_flag")]
    pub liked: bool,
}

impl LabeledExample {
    pub fn new(title: impl Into<String>, liked: bool) -> Self {
        Self {
            title: title.into(),
            liked,
        }
    }

    pub fn label(&self) -> Label {
        Label::from_liked(self.liked)
    }
}

/// Older snapshots stored `liked` as the integers 0/1
fn bool_or_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => Ok(b),
        Flag::Int(0) => Ok(false),
        Flag::Int(1) => Ok(true),
        Flag::Int(other) => Err(serde::de::Error::custom(format!(
            "liked must be 0 or 1, got {}",
            other
        ))),
    }
}

/// Per-class scores produced by the model for one title
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    #[serde(rename = "likedScore")]
    pub liked_score: f64,
    #[serde(rename = "dislikedScore")]
    pub disliked_score: f64,
}

impl ClassificationResult {
    /// Score returned when neither class has any documents
    pub const NEUTRAL: ClassificationResult = ClassificationResult {
        liked_score: 0.5,
        disliked_score: 0.5,
    };
}

/// What a feedback event did to the corpus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackStatus {
    Inserted,
    Updated,
    Unchanged,
}

/// Verdict for a classified title
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub recommend: bool,
    pub scores: ClassificationResult,
}

/// Snapshot of corpus and model sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusStats {
    pub total_examples: usize,
    pub liked_documents: u64,
    pub disliked_documents: u64,
    pub vocabulary_size: usize,
}
