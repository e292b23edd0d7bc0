use std::collections::{HashMap, HashSet};

use crate::models::{ClassificationResult, Label, LabeledExample};
use crate::core::tokenizer::Tokenizer;

/// Token counts and document count for one class
#[derive(Debug, Clone, Default)]
struct ClassCounts {
    documents: u64,
    token_total: u64,
    tokens: HashMap<String, u64>,
}

impl ClassCounts {
    fn token_count(&self, token: &str) -> u64 {
        self.tokens.get(token).copied().unwrap_or(0)
    }
}

/// Incremental multinomial Naive Bayes over two classes
///
/// Counts only ever grow through [`NaiveBayes::observe`]; the only way to
/// shrink them is a full [`NaiveBayes::reset`] followed by a retrain.
#[derive(Debug, Clone, Default)]
pub struct NaiveBayes {
    liked: ClassCounts,
    disliked: ClassCounts,
    vocabulary: HashSet<String>,
}

impl NaiveBayes {
    pub fn new() -> Self {
        Self::default()
    }

    fn class(&self, label: Label) -> &ClassCounts {
        match label {
            Label::Liked => &self.liked,
            Label::Disliked => &self.disliked,
        }
    }

    fn class_mut(&mut self, label: Label) -> &mut ClassCounts {
        match label {
            Label::Liked => &mut self.liked,
            Label::Disliked => &mut self.disliked,
        }
    }

    /// Clear all counts for both classes
    pub fn reset(&mut self) {
        self.liked = ClassCounts::default();
        self.disliked = ClassCounts::default();
        self.vocabulary.clear();
    }

    /// Add one document to `label`, counting every token occurrence
    pub fn observe<S: AsRef<str>>(&mut self, tokens: &[S], label: Label) {
        for token in tokens {
            let token = token.as_ref();
            if !self.vocabulary.contains(token) {
                self.vocabulary.insert(token.to_string());
            }
        }

        let class = self.class_mut(label);
        class.documents += 1;
        for token in tokens {
            *class.tokens.entry(token.as_ref().to_string()).or_insert(0) += 1;
            class.token_total += 1;
        }
    }

    /// Rebuild the model from scratch out of `examples`
    pub fn train<'a, I>(&mut self, tokenizer: &Tokenizer, examples: I)
    where
        I: IntoIterator<Item = &'a LabeledExample>,
    {
        self.reset();
        for example in examples {
            let tokens = tokenizer.tokenize(&example.title);
            self.observe(&tokens, example.label());
        }
    }

    pub fn document_count(&self, label: Label) -> u64 {
        self.class(label).documents
    }

    pub fn total_documents(&self) -> u64 {
        self.liked.documents + self.disliked.documents
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn is_trained(&self) -> bool {
        self.total_documents() > 0
    }

    /// Unnormalized log posterior for `label`, or `None` for an empty class
    ///
    /// log P(label) + sum over tokens of log((count + 1) / (class_total + |V|))
    pub fn log_likelihood<S: AsRef<str>>(&self, tokens: &[S], label: Label) -> Option<f64> {
        let class = self.class(label);
        if class.documents == 0 {
            return None;
        }

        let prior = class.documents as f64 / self.total_documents() as f64;

        // Only token-less documents seen so far; tokens carry no evidence
        if self.vocabulary.is_empty() {
            return Some(prior.ln());
        }

        let denominator = (class.token_total + self.vocabulary.len() as u64) as f64;

        let evidence: f64 = tokens
            .iter()
            .map(|token| {
                let count = class.token_count(token.as_ref()) as f64;
                ((count + 1.0) / denominator).ln()
            })
            .sum();

        Some(prior.ln() + evidence)
    }

    /// Score `tokens` against both classes
    ///
    /// Scores are posteriors normalized to sum to 1. A trained class never
    /// scores below `f64::MIN_POSITIVE`; an empty class scores 0. With no
    /// documents at all the neutral result is returned, and with an empty
    /// vocabulary only the priors count.
    pub fn score<S: AsRef<str>>(&self, tokens: &[S]) -> ClassificationResult {
        let liked = self.log_likelihood(tokens, Label::Liked);
        let disliked = self.log_likelihood(tokens, Label::Disliked);

        match (liked, disliked) {
            (None, None) => ClassificationResult::NEUTRAL,
            (Some(_), None) => ClassificationResult {
                liked_score: 1.0,
                disliked_score: 0.0,
            },
            (None, Some(_)) => ClassificationResult {
                liked_score: 0.0,
                disliked_score: 1.0,
            },
            (Some(l), Some(d)) => {
                // log-sum-exp keeps the larger term at exp(0) = 1
                let max = l.max(d);
                let l_exp = (l - max).exp();
                let d_exp = (d - max).exp();
                let sum = l_exp + d_exp;

                ClassificationResult {
                    liked_score: (l_exp / sum).max(f64::MIN_POSITIVE),
                    disliked_score: (d_exp / sum).max(f64::MIN_POSITIVE),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<String> {
        Tokenizer::default().tokenize(text)
    }

    #[test]
    fn test_untrained_is_neutral() {
        let model = NaiveBayes::new();
        assert!(!model.is_trained());
        assert_eq!(model.score(&tokens("anything")), ClassificationResult::NEUTRAL);
    }

    #[test]
    fn test_observe_counts() {
        let mut model = NaiveBayes::new();
        model.observe(&["rust", "rust", "tips"], Label::Liked);
        model.observe(&["drama"], Label::Disliked);

        assert_eq!(model.document_count(Label::Liked), 1);
        assert_eq!(model.document_count(Label::Disliked), 1);
        assert_eq!(model.total_documents(), 2);
        assert_eq!(model.vocabulary_size(), 3);
        assert_eq!(model.liked.token_count("rust"), 2);
        assert_eq!(model.liked.token_total, 3);
    }

    #[test]
    fn test_single_class_scores() {
        let mut model = NaiveBayes::new();
        model.observe(&["rust"], Label::Liked);

        let result = model.score(&["rust"]);
        assert_eq!(result.liked_score, 1.0);
        assert_eq!(result.disliked_score, 0.0);
    }

    #[test]
    fn test_unseen_token_has_positive_floor() {
        let mut model = NaiveBayes::new();
        model.observe(&["rust", "tutorial"], Label::Liked);
        model.observe(&["gossip", "drama"], Label::Disliked);

        let liked = model.log_likelihood(&["never", "seen"], Label::Liked).unwrap();
        assert!(liked.is_finite());
        assert!(liked.exp() > 0.0);

        let result = model.score(&["never", "seen"]);
        assert!(result.liked_score > 0.0);
        assert!(result.disliked_score > 0.0);
    }

    #[test]
    fn test_no_underflow_for_long_inputs() {
        let mut model = NaiveBayes::new();
        model.observe(&["good"], Label::Liked);
        for _ in 0..50 {
            model.observe(&["bad"; 20], Label::Disliked);
        }

        let long_input = vec!["bad"; 5000];
        let result = model.score(&long_input);
        assert!(result.liked_score > 0.0);
        assert!(result.disliked_score > result.liked_score);
    }

    #[test]
    fn test_scores_follow_evidence() {
        let mut model = NaiveBayes::new();
        model.observe(&["rust", "tutorial"], Label::Liked);
        model.observe(&["python", "tutorial"], Label::Liked);
        model.observe(&["celebrity", "gossip"], Label::Disliked);

        let liked = model.score(&["rust"]);
        assert!(liked.liked_score > liked.disliked_score);

        let disliked = model.score(&["gossip"]);
        assert!(disliked.disliked_score > disliked.liked_score);
    }

    #[test]
    fn test_train_resets_before_replay() {
        let tokenizer = Tokenizer::default();
        let examples = vec![
            LabeledExample::new("rust tutorial", true),
            LabeledExample::new("gossip", false),
        ];

        let mut model = NaiveBayes::new();
        model.train(&tokenizer, &examples);
        model.train(&tokenizer, &examples);

        assert_eq!(model.total_documents(), 2);
        assert_eq!(model.liked.token_count("rust"), 1);
    }

    #[test]
    fn test_empty_vocabulary_falls_back_to_priors() {
        let tokenizer = Tokenizer::default();
        let examples = vec![
            LabeledExample::new("!!!", true),
            LabeledExample::new("???", true),
            LabeledExample::new("...", false),
        ];

        let mut model = NaiveBayes::new();
        model.train(&tokenizer, &examples);
        assert_eq!(model.vocabulary_size(), 0);

        let result = model.score(&["rust"]);
        assert!(result.liked_score.is_finite() && result.disliked_score.is_finite());
        assert!((result.liked_score - 2.0 / 3.0).abs() < 1e-9);
        assert!((result.disliked_score - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_reset() {
        let mut model = NaiveBayes::new();
        model.observe(&["rust"], Label::Liked);
        model.reset();

        assert!(!model.is_trained());
        assert_eq!(model.vocabulary_size(), 0);
    }
}
