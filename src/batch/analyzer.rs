use super::summary::{BatchReport, IndexedSegmentReport};
use crate::segment::{AnalyzerOptions, InitContext, SegmentAnalyzer, SegmentReport};
use crate::streams::SegmentSource;
use log::{info, warn};
use std::sync::Arc;
use tokio::sync::Semaphore;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOptions {
    /// Upper bound on segments analyzed at once; `None` starts them all
    pub max_concurrent: Option<usize>,
}

/// Runs a [`SegmentAnalyzer`] over many segment sources concurrently.
#[derive(Debug, Clone, Default)]
pub struct BatchAnalyzer {
    analyzer: SegmentAnalyzer,
    options: BatchOptions,
}

impl BatchAnalyzer {
    pub fn new(analyzer_options: AnalyzerOptions, options: BatchOptions) -> Self {
        Self {
            analyzer: SegmentAnalyzer::new(analyzer_options),
            options,
        }
    }

    /// Decode an init segment and use its tracks for every fragment of the batch.
    pub fn with_init_segment(self, data: &[u8]) -> Self {
        let (report, context) = self.analyzer.analyze_with_context(data);
        if context.is_empty() {
            warn!(
                "init segment ({} bytes) has no usable tracks: {:?}",
                data.len(),
                report.issues
            );
        }
        self.with_init_context(context)
    }

    pub fn with_init_context(mut self, context: impl Into<Arc<InitContext>>) -> Self {
        self.analyzer = self.analyzer.with_init_context(context);
        self
    }

    /// Analyze every `(index, source)` pair and return reports sorted by index.
    ///
    /// Waits for all segments. A source that cannot be fetched, or a task
    /// that dies, only affects the report at its own index.
    pub async fn analyze<S>(&self, sources: Vec<(usize, S)>) -> BatchReport
    where
        S: SegmentSource + 'static,
    {
        info!("🚀 Analyzing {} segment(s)", sources.len());
        let limiter = self
            .options
            .max_concurrent
            .map(|permits| Arc::new(Semaphore::new(permits.max(1))));

        let mut handles = Vec::with_capacity(sources.len());
        for (index, source) in sources {
            let analyzer = self.analyzer.clone();
            let limiter = limiter.clone();
            let handle = tokio::spawn(async move {
                let _permit = match limiter {
                    Some(semaphore) => semaphore.acquire_owned().await.ok(),
                    None => None,
                };
                analyzer.analyze_source(&source).await
            });
            handles.push((index, handle));
        }

        let mut segments = Vec::with_capacity(handles.len());
        for (index, handle) in handles {
            let report = match handle.await {
                Ok(report) => report,
                Err(e) => {
                    warn!("analysis task for segment {} failed: {}", index, e);
                    SegmentReport::failed(format!(
                        "Analysis task for segment {} failed: {}",
                        index, e
                    ))
                }
            };
            segments.push(IndexedSegmentReport { index, report });
        }

        let batch = BatchReport::new(segments);
        info!(
            "✅ Analyzed {} segment(s), {} bytes total, {} issue(s)",
            batch.summary.segment_count, batch.summary.total_size_bytes, batch.summary.issue_count
        );
        batch
    }
}
