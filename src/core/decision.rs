use crate::models::ClassificationResult;

/// Default corpus size below which every title is recommended
pub const DEFAULT_MIN_EXAMPLES: usize = 10;

/// Default share of the combined evidence the liked score has to reach
pub const DEFAULT_THRESHOLD_FRACTION: f64 = 0.4;

/// Turns class scores into a show/suppress verdict
///
/// # Rule order
/// 1. Cold start: fewer than `min_examples` stored examples recommends
/// 2. Veto: a strictly greater disliked score suppresses
/// 3. Threshold: liked must reach `threshold_fraction` of liked + disliked
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionPolicy {
    pub min_examples: usize,
    pub threshold_fraction: f64,
}

impl DecisionPolicy {
    pub fn new(min_examples: usize, threshold_fraction: f64) -> Self {
        Self {
            min_examples,
            threshold_fraction,
        }
    }

    #[inline]
    pub fn decide(&self, result: &ClassificationResult, total_examples: usize) -> bool {
        if total_examples < self.min_examples {
            return true;
        }

        if result.disliked_score > result.liked_score {
            return false;
        }

        let combined_threshold =
            (result.liked_score + result.disliked_score) * self.threshold_fraction;
        result.liked_score >= combined_threshold
    }
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_EXAMPLES, DEFAULT_THRESHOLD_FRACTION)
    }
}
