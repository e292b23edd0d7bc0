// Core algorithm exports
pub mod bayes;
pub mod decision;
pub mod engine;
pub mod tokenizer;

pub use bayes::NaiveBayes;
pub use decision::{DecisionPolicy, DEFAULT_MIN_EXAMPLES, DEFAULT_THRESHOLD_FRACTION};
pub use engine::{Recommender, RecommendError, SharedRecommender};
pub use tokenizer::{Tokenizer, TokenizerOptions};
