//! Rec Algo - Bayesian like/dislike recommendation service
//!
//! This library learns from like/dislike feedback on short titles and decides
//! whether a new title should be shown or suppressed. It combines an
//! incremental Naive Bayes classifier with a comparative threshold policy.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{Recommender, RecommendError, SharedRecommender, NaiveBayes, DecisionPolicy, Tokenizer, TokenizerOptions};
pub use crate::models::{LabeledExample, Label, ClassificationResult, FeedbackStatus, Recommendation};
pub use crate::services::{TrainingStore, JsonFileStore, MemoryStore};
