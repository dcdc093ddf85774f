use super::super::domain::SignalCategory;
use super::normalizer::normalize_text;

pub const DEFAULT_WEIGHT: f64 = 1.0;

const STANDARD_RULES: &[(SignalCategory, &str, f64)] = &[
    (SignalCategory::Hiring, "hiring", 1.5),
    (SignalCategory::Hiring, "recruit", 1.0),
    (SignalCategory::Hiring, "open role", 1.0),
    (SignalCategory::Hiring, "job opening", 1.0),
    (SignalCategory::Hiring, "join our team", 1.0),
    (SignalCategory::Hiring, "talent acquisition", 0.5),
    (SignalCategory::Expansion, "expanding", 1.0),
    (SignalCategory::Expansion, "expansion", 1.0),
    (SignalCategory::Expansion, "branch network", 1.0),
    (SignalCategory::Expansion, "new branch", 1.0),
    (SignalCategory::Expansion, "new office", 1.0),
    (SignalCategory::Expansion, "new market", 1.0),
    (SignalCategory::LeadershipChange, "appointed", 1.0),
    (SignalCategory::LeadershipChange, "appointment", 1.0),
    (SignalCategory::LeadershipChange, "steps down", 1.0),
    (SignalCategory::LeadershipChange, "stepping down", 1.0),
    (SignalCategory::LeadershipChange, "promoted to", 1.0),
    (SignalCategory::LeadershipChange, "welcome aboard", 0.5),
    (SignalCategory::DigitalInitiative, "digital transformation", 1.5),
    (SignalCategory::DigitalInitiative, "digitisation", 1.0),
    (SignalCategory::DigitalInitiative, "digitization", 1.0),
    (SignalCategory::DigitalInitiative, "technology", 1.0),
    (SignalCategory::DigitalInitiative, "automation", 1.0),
    (SignalCategory::DigitalInitiative, "core banking", 1.0),
    (SignalCategory::DigitalInitiative, "mobile app", 1.0),
    (SignalCategory::DigitalInitiative, "cloud", 0.5),
    (SignalCategory::Other, "partnership", 0.5),
    (SignalCategory::Other, "award", 0.5),
    (SignalCategory::Other, "milestone", 0.5),
];

/// One row of the keyword table.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordRule {
    pub category: SignalCategory,
    pub keyword: String,
    pub weight: f64,
}

impl KeywordRule {
    /// Keywords are stored normalized so they compare directly against
    /// normalized post text.
    pub fn new(category: SignalCategory, keyword: &str, weight: f64) -> Self {
        Self {
            category,
            keyword: normalize_text(keyword),
            weight,
        }
    }
}

/// Category → keyword mapping held as data so the heuristic can be swapped
/// without touching compilation or rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordTable {
    rules: Vec<KeywordRule>,
}

impl KeywordTable {
    pub fn standard() -> Self {
        Self::from_rules(
            STANDARD_RULES
                .iter()
                .map(|(category, keyword, weight)| KeywordRule::new(*category, keyword, *weight)),
        )
    }

    pub fn from_rules(rules: impl IntoIterator<Item = KeywordRule>) -> Self {
        Self {
            rules: rules.into_iter().collect(),
        }
    }

    pub fn rules(&self) -> &[KeywordRule] {
        &self.rules
    }

    pub fn rules_for(&self, category: SignalCategory) -> impl Iterator<Item = &KeywordRule> {
        self.rules
            .iter()
            .filter(move |rule| rule.category == category)
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self::standard()
    }
}
