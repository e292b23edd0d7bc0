/// Common English function words, dropped when `drop_stop_words` is set
const STOP_WORDS: &[&str] = &[
    "a", "about", "after", "all", "an", "and", "are", "as", "at", "be", "but", "by", "can",
    "do", "for", "from", "has", "have", "he", "her", "his", "how", "i", "if", "in", "into",
    "is", "it", "its", "me", "my", "no", "not", "of", "on", "or", "our", "she", "so", "than",
    "that", "the", "their", "them", "then", "there", "they", "this", "to", "up", "was", "we",
    "were", "what", "when", "which", "who", "why", "will", "with", "you", "your",
];

/// Shortest stem the suffix stripper is allowed to leave behind
const MIN_STEM_CHARS: usize = 3;

/// Tokenizer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenizerOptions {
    pub stem: bool,
    pub drop_stop_words: bool,
}

impl Default for TokenizerOptions {
    fn default() -> Self {
        Self {
            stem: true,
            drop_stop_words: false,
        }
    }
}

/// Turns a title into a bag of normalized tokens
///
/// Tokenization is a pure function of the input and the options, so training
/// and classification always see identical features for identical titles.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tokenizer {
    options: TokenizerOptions,
}

impl Tokenizer {
    pub fn new(options: TokenizerOptions) -> Self {
        Self { options }
    }

    /// Split `text` into lowercase alphanumeric tokens
    ///
    /// Empty input yields an empty sequence.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_lowercase())
            .filter(|s| !(self.options.drop_stop_words && STOP_WORDS.contains(&s.as_str())))
            .map(|s| if self.options.stem { stem(&s) } else { s })
            .collect()
    }
}

/// Light English suffix stripper
///
/// Handles plurals first, then at most one of `-ing`, `-ed`, `-ly`.
fn stem(token: &str) -> String {
    let mut word = strip_plural(token);

    for suffix in ["ing", "ed", "ly"] {
        if let Some(base) = word.strip_suffix(suffix) {
            if base.chars().count() >= MIN_STEM_CHARS {
                word = base.to_string();
                break;
            }
        }
    }

    word
}

fn strip_plural(token: &str) -> String {
    if let Some(base) = token.strip_suffix("ies") {
        if base.chars().count() >= MIN_STEM_CHARS - 1 {
            return format!("{}y", base);
        }
    }

    if let Some(base) = token.strip_suffix("sses") {
        return format!("{}ss", base);
    }

    // -es only after a sibilant: boxes, watches, wishes, quizzes
    if ["xes", "ches", "shes", "zes"].iter().any(|suffix| token.ends_with(suffix)) {
        if let Some(base) = token.strip_suffix("es") {
            if base.chars().count() >= MIN_STEM_CHARS {
                return base.to_string();
            }
        }
    }

    if token.ends_with("ss") || token.ends_with("us") || token.ends_with("is") {
        return token.to_string();
    }

    match token.strip_suffix('s') {
        Some(base) if base.chars().count() >= MIN_STEM_CHARS => base.to_string(),
        _ => token.to_string(),
    }
}
