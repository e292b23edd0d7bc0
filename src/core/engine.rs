use crate::core::{bayes::NaiveBayes, decision::DecisionPolicy, tokenizer::Tokenizer};
use crate::models::{CorpusStats, FeedbackStatus, Label, LabeledExample, Recommendation};
use crate::services::{StoreError, TrainingStore, UpsertOutcome};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

/// Errors returned by the recommendation engine
#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Persistence failure: {0}")]
    Persistence(#[from] StoreError),

    #[error("Feedback task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Classification engine owning the corpus and the model trained on it
///
/// The store is written before the model is touched, so a failed write
/// leaves both exactly as they were.
pub struct Recommender {
    store: Box<dyn TrainingStore>,
    model: NaiveBayes,
    tokenizer: Tokenizer,
    policy: DecisionPolicy,
}

impl Recommender {
    /// Build the engine and train it on everything already in `store`
    pub fn new(store: Box<dyn TrainingStore>, tokenizer: Tokenizer, policy: DecisionPolicy) -> Self {
        let mut recommender = Self {
            store,
            model: NaiveBayes::new(),
            tokenizer,
            policy,
        };
        recommender.retrain();

        tracing::info!(
            "Recommender trained on {} examples (vocabulary: {})",
            recommender.store.len(),
            recommender.model.vocabulary_size()
        );

        recommender
    }

    /// Rebuild the model from the full corpus
    pub fn retrain(&mut self) {
        self.model.train(&self.tokenizer, self.store.examples());
    }

    /// Record like/dislike feedback for `title`
    pub fn record_feedback(&mut self, title: &str, liked: bool) -> Result<FeedbackStatus, RecommendError> {
        validate_title(title)?;

        let example = LabeledExample::new(title, liked);
        let label = example.label();
        let outcome = self.store.upsert(example)?;

        let status = match outcome {
            UpsertOutcome::Inserted { evicted: None } => {
                let tokens = self.tokenizer.tokenize(title);
                self.model.observe(&tokens, label);
                tracing::info!("Added title: {} as {}", title, label.as_str());
                FeedbackStatus::Inserted
            }
            UpsertOutcome::Inserted { evicted: Some(oldest) } => {
                tracing::debug!("Corpus full, evicted oldest title: {}", oldest.title);
                self.retrain();
                tracing::info!("Added title: {} as {}", title, label.as_str());
                FeedbackStatus::Inserted
            }
            UpsertOutcome::Updated => {
                self.retrain();
                tracing::info!("Updated title: {} to {}", title, label.as_str());
                FeedbackStatus::Updated
            }
            UpsertOutcome::Unchanged => {
                tracing::debug!("Title: {} already stored as {}", title, label.as_str());
                FeedbackStatus::Unchanged
            }
        };

        Ok(status)
    }

    /// Decide whether `title` should be shown
    pub fn classify(&self, title: &str) -> Result<Recommendation, RecommendError> {
        validate_title(title)?;

        let tokens = self.tokenizer.tokenize(title);
        let scores = self.model.score(&tokens);
        let recommend = self.policy.decide(&scores, self.store.len());

        tracing::debug!(
            "Classified {:?}: liked={}, disliked={}, recommend={}",
            title,
            scores.liked_score,
            scores.disliked_score,
            recommend
        );

        Ok(Recommendation { recommend, scores })
    }

    pub fn stats(&self) -> CorpusStats {
        CorpusStats {
            total_examples: self.store.len(),
            liked_documents: self.model.document_count(Label::Liked),
            disliked_documents: self.model.document_count(Label::Disliked),
            vocabulary_size: self.model.vocabulary_size(),
        }
    }

    pub fn total_examples(&self) -> usize {
        self.store.len()
    }

    pub fn is_trained(&self) -> bool {
        self.model.is_trained()
    }

    pub fn policy(&self) -> &DecisionPolicy {
        &self.policy
    }
}

fn validate_title(title: &str) -> Result<(), RecommendError> {
    if title.is_empty() {
        return Err(RecommendError::InvalidInput("title must be a non-empty string".to_string()));
    }
    Ok(())
}

/// Shared handle to a [`Recommender`]
///
/// Feedback takes the write lock, classification and stats share the read
/// lock, so at most one mutation is ever in flight. The snapshot write and
/// any retrain run on the blocking pool while the write lock is held.
#[derive(Clone)]
pub struct SharedRecommender {
    inner: Arc<RwLock<Recommender>>,
}

impl SharedRecommender {
    pub fn new(recommender: Recommender) -> Self {
        Self {
            inner: Arc::new(RwLock::new(recommender)),
        }
    }

    pub async fn record_feedback(&self, title: &str, liked: bool) -> Result<(FeedbackStatus, usize), RecommendError> {
        let mut recommender = self.inner.clone().write_owned().await;
        let title = title.to_string();

        tokio::task::spawn_blocking(move || {
            let status = recommender.record_feedback(&title, liked)?;
            Ok::<_, RecommendError>((status, recommender.total_examples()))
        })
        .await?
    }

    pub async fn classify(&self, title: &str) -> Result<Recommendation, RecommendError> {
        self.inner.read().await.classify(title)
    }

    pub async fn stats(&self) -> CorpusStats {
        self.inner.read().await.stats()
    }

    pub async fn is_trained(&self) -> bool {
        self.inner.read().await.is_trained()
    }
}
