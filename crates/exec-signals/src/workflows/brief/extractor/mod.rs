mod excerpt;
mod normalizer;
mod table;

pub use excerpt::{excerpt, DEFAULT_EXCERPT_CHARS};
pub use table::{KeywordRule, KeywordTable, DEFAULT_WEIGHT};

pub(crate) use normalizer::normalize_text;

use super::domain::{Post, Signal, SignalCategory};
use normalizer::matches_at_word_start;
use tracing::debug;

/// Capability shared by every extraction strategy: turn one post into zero or
/// more signals. Output order within a post must be stable.
pub trait SignalScorer {
    fn score(&self, post: &Post) -> Vec<Signal>;
}

/// Keyword heuristic: one signal per category with at least one matching
/// keyword, scored as the sum of matched weights.
#[derive(Debug, Clone)]
pub struct KeywordTableScorer {
    table: KeywordTable,
    excerpt_chars: usize,
}

impl KeywordTableScorer {
    pub fn new(table: KeywordTable) -> Self {
        Self {
            table,
            excerpt_chars: DEFAULT_EXCERPT_CHARS,
        }
    }

    pub fn standard() -> Self {
        Self::new(KeywordTable::standard())
    }

    pub fn with_excerpt_chars(mut self, excerpt_chars: usize) -> Self {
        self.excerpt_chars = excerpt_chars;
        self
    }

    pub fn table(&self) -> &KeywordTable {
        &self.table
    }

    fn match_category<'a>(
        &'a self,
        category: SignalCategory,
        normalized: &str,
    ) -> (Vec<&'a str>, f64) {
        let mut matched: Vec<&str> = Vec::new();
        let mut score = 0.0;

        for rule in self.table.rules_for(category) {
            if matched.contains(&rule.keyword.as_str()) {
                continue;
            }
            if matches_at_word_start(normalized, &rule.keyword) {
                matched.push(&rule.keyword);
                score += rule.weight;
            }
        }

        (matched, score)
    }
}

impl Default for KeywordTableScorer {
    fn default() -> Self {
        Self::standard()
    }
}

impl SignalScorer for KeywordTableScorer {
    fn score(&self, post: &Post) -> Vec<Signal> {
        let normalized = normalize_text(&post.text);
        if normalized.is_empty() {
            return Vec::new();
        }

        let mut signals = Vec::new();
        let mut snippet: Option<String> = None;

        for category in SignalCategory::ordered() {
            let (matched, score) = self.match_category(category, &normalized);
            if matched.is_empty() {
                continue;
            }

            let excerpt = snippet
                .get_or_insert_with(|| excerpt(&post.text, self.excerpt_chars))
                .clone();

            signals.push(Signal {
                post_id: post.id.clone(),
                company: post.company.clone(),
                category,
                keyword_matches: matched.into_iter().map(str::to_string).collect(),
                score,
                excerpt,
            });
        }

        signals
    }
}

/// Runs the scorer over a batch, keeping post order.
pub fn extract_signals<S>(scorer: &S, posts: &[Post]) -> Vec<Signal>
where
    S: SignalScorer + ?Sized,
{
    let signals: Vec<Signal> = posts.iter().flat_map(|post| scorer.score(post)).collect();
    debug!(
        posts = posts.len(),
        signals = signals.len(),
        "extracted signals from snapshot"
    );
    signals
}
