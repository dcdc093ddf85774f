use super::domain::{
    profiles_by_company, Brief, BriefScope, Post, PostDetails, Signal, SignalCategory,
};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BriefError {
    #[error("the snapshot contained no posts to analyse")]
    EmptyInputBatch,
}

/// Groups, ranks and caps signals per company. Holds only policy; the
/// compilation timestamp is supplied by the caller.
#[derive(Debug, Clone, Default)]
pub struct BriefCompiler {
    max_signals_per_company: Option<usize>,
}

impl BriefCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_signals_per_company(mut self, cap: Option<usize>) -> Self {
        self.max_signals_per_company = cap;
        self
    }

    pub fn max_signals_per_company(&self) -> Option<usize> {
        self.max_signals_per_company
    }

    pub fn compile(
        &self,
        posts: &[Post],
        signals: Vec<Signal>,
        scope: &BriefScope,
        generated_at: DateTime<Utc>,
    ) -> Result<Brief, BriefError> {
        if posts.is_empty() {
            return Err(BriefError::EmptyInputBatch);
        }

        let posted_at: HashMap<&str, DateTime<Utc>> = posts
            .iter()
            .map(|post| (post.id.as_str(), post.posted_at))
            .collect();

        let mut company_sections: BTreeMap<String, Vec<Signal>> = scope
            .companies
            .iter()
            .map(|company| (company.clone(), Vec::new()))
            .collect();
        let mut seen: HashSet<(String, SignalCategory)> = HashSet::new();

        for signal in signals {
            if !posted_at.contains_key(signal.post_id.as_str()) {
                warn!(post_id = %signal.post_id, "dropping signal without a source post in this batch");
                continue;
            }
            if !seen.insert((signal.post_id.clone(), signal.category)) {
                continue;
            }

            company_sections
                .entry(scope.canonical_company(&signal.company))
                .or_default()
                .push(signal);
        }

        for (company, section) in company_sections.iter_mut() {
            section.sort_by(|a, b| rank_order(a, b, &posted_at));

            if let Some(cap) = self.max_signals_per_company {
                if section.len() > cap {
                    debug!(
                        company = %company,
                        dropped = section.len() - cap,
                        "capping company section"
                    );
                    section.truncate(cap);
                }
            }
        }

        let retained: HashSet<&str> = company_sections
            .values()
            .flatten()
            .map(|signal| signal.post_id.as_str())
            .collect();
        let source_details: BTreeMap<String, PostDetails> = posts
            .iter()
            .filter(|post| retained.contains(post.id.as_str()))
            .map(|post| (post.id.clone(), PostDetails::from(post)))
            .collect();

        Ok(Brief {
            generated_at,
            window: scope.window,
            source_posts: posts.len(),
            company_sections,
            monitored_profiles: profiles_by_company(scope),
            source_details,
        })
    }
}

/// Score descending, then source post recency, then post id. Category breaks
/// the last tie between two signals from the same post.
pub(crate) fn rank_order(
    a: &Signal,
    b: &Signal,
    posted_at: &HashMap<&str, DateTime<Utc>>,
) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| {
            posted_at
                .get(b.post_id.as_str())
                .cmp(&posted_at.get(a.post_id.as_str()))
        })
        .then_with(|| a.post_id.cmp(&b.post_id))
        .then_with(|| a.category.cmp(&b.category))
}
