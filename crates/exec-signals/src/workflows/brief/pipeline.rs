use super::compiler::{BriefCompiler, BriefError};
use super::domain::{Brief, BriefScope, Post};
use super::extractor::{extract_signals, KeywordTableScorer, SignalScorer};
use chrono::{DateTime, Utc};
use tracing::info;

/// Extraction followed by compilation over one batch of posts.
#[derive(Debug, Clone, Default)]
pub struct BriefPipeline<S = KeywordTableScorer> {
    scorer: S,
    compiler: BriefCompiler,
}

impl<S: SignalScorer> BriefPipeline<S> {
    pub fn new(scorer: S, compiler: BriefCompiler) -> Self {
        Self { scorer, compiler }
    }

    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    pub fn compiler(&self) -> &BriefCompiler {
        &self.compiler
    }

    pub fn run(
        &self,
        posts: &[Post],
        scope: &BriefScope,
        generated_at: DateTime<Utc>,
    ) -> Result<Brief, BriefError> {
        let signals = extract_signals(&self.scorer, posts);
        let brief = self.compiler.compile(posts, signals, scope, generated_at)?;
        info!(
            posts = brief.source_posts,
            companies = brief.company_sections.len(),
            signals = brief.signal_count(),
            "compiled weekly brief"
        );
        Ok(brief)
    }
}
