//! End-to-end orchestration of the scoring chain.
//!
//! [`QualityReportGenerator`] parses every submitted file, then runs the
//! analyzers in a fixed order so each stage sees finished upstream bundles:
//!
//! 1. parsing (per-file failures are logged and skipped)
//! 2. complexity
//! 3. duplication
//! 4. debt (needs complexity and duplication)
//! 5. testability, performance, maintainability (need complexity)
//! 6. report assembly (needs all six)
//!
//! The async entry points run the whole chain as one blocking unit of work and
//! race it against a deadline or a caller-supplied stop signal. Stopping raises
//! a [`CancellationFlag`] that the chain checks between stages; work already
//! inside a stage runs to completion and its result is discarded.

use std::collections::BTreeMap;
use std::future::Future;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::adapters::{
    DuplicationDetector, FactsJsonParser, PerformanceAnalyzer, ShapeDuplicationDetector,
    ShapePerformanceAnalyzer, SourceParser,
};
use crate::complexity::ComplexityScorer;
use crate::config::QualityConfig;
use crate::core::{FileFacts, QualityError, Result};
use crate::debt::DebtScorer;
use crate::maintainability::MaintainabilityScorer;
use crate::observability::{stage_span, AnalysisStage};
use crate::testability::TestabilityScorer;

use super::{assemble, ParseFailure, QualityReport, ReportInputs};

/// Shared stop signal plus the stage the chain last entered.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag {
    cancelled: Arc<AtomicBool>,
    stage: Arc<AtomicUsize>,
}

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub fn current_stage(&self) -> AnalysisStage {
        let index = self.stage.load(Ordering::SeqCst);
        AnalysisStage::ALL
            .get(index)
            .copied()
            .unwrap_or(AnalysisStage::ReportAssembly)
    }

    /// Record entry into `stage`, or fail if the caller already stopped waiting.
    pub fn enter(&self, stage: AnalysisStage) -> Result<()> {
        if self.is_cancelled() {
            return Err(QualityError::Cancelled {
                stage: self.current_stage(),
            });
        }
        if let Some(index) = AnalysisStage::ALL.iter().position(|s| *s == stage) {
            self.stage.store(index, Ordering::SeqCst);
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct QualityReportGenerator {
    config: QualityConfig,
    parser: Arc<dyn SourceParser>,
    duplication: Arc<dyn DuplicationDetector>,
    performance: Arc<dyn PerformanceAnalyzer>,
}

impl Default for QualityReportGenerator {
    fn default() -> Self {
        Self::new(QualityConfig::default())
    }
}

impl QualityReportGenerator {
    /// Generator with the built-in JSON facts parser and shape-based detectors.
    pub fn new(config: QualityConfig) -> Self {
        let performance = ShapePerformanceAnalyzer::new(config.complexity.severity);
        Self {
            config,
            parser: Arc::new(FactsJsonParser),
            duplication: Arc::new(ShapeDuplicationDetector),
            performance: Arc::new(performance),
        }
    }

    pub fn with_parser(mut self, parser: impl SourceParser + 'static) -> Self {
        self.parser = Arc::new(parser);
        self
    }

    pub fn with_duplication_detector(mut self, detector: impl DuplicationDetector + 'static) -> Self {
        self.duplication = Arc::new(detector);
        self
    }

    pub fn with_performance_analyzer(
        mut self,
        analyzer: impl PerformanceAnalyzer + 'static,
    ) -> Self {
        self.performance = Arc::new(analyzer);
        self
    }

    pub fn config(&self) -> &QualityConfig {
        &self.config
    }

    /// Run the chain synchronously on the calling thread.
    pub fn generate(&self, sources: &BTreeMap<PathBuf, String>) -> Result<QualityReport> {
        self.run(sources, &CancellationFlag::new())
    }

    /// Run the chain, giving up once `limit` elapses.
    pub async fn generate_with_deadline(
        &self,
        sources: BTreeMap<PathBuf, String>,
        limit: Duration,
    ) -> Result<QualityReport> {
        self.race(sources, tokio::time::sleep(limit), |_| {
            QualityError::DeadlineExceeded { limit }
        })
        .await
    }

    /// Run the chain until it finishes or `stop` resolves, whichever is first.
    pub async fn generate_until<F>(
        &self,
        sources: BTreeMap<PathBuf, String>,
        stop: F,
    ) -> Result<QualityReport>
    where
        F: Future<Output = ()>,
    {
        self.race(sources, stop, |stage| QualityError::Cancelled { stage })
            .await
    }

    async fn race<F>(
        &self,
        sources: BTreeMap<PathBuf, String>,
        stop: F,
        interrupted: impl FnOnce(AnalysisStage) -> QualityError,
    ) -> Result<QualityReport>
    where
        F: Future<Output = ()>,
    {
        let flag = CancellationFlag::new();
        let worker_flag = flag.clone();
        let generator = self.clone();
        let worker = tokio::task::spawn_blocking(move || generator.run(&sources, &worker_flag));

        tokio::pin!(stop);
        tokio::select! {
            joined = worker => joined.map_err(|e| QualityError::Task(e.to_string()))?,
            () = &mut stop => {
                flag.cancel();
                let stage = flag.current_stage();
                info!(stage = %stage, "Caller stopped waiting for analysis");
                Err(interrupted(stage))
            }
        }
    }

    fn run(
        &self,
        sources: &BTreeMap<PathBuf, String>,
        flag: &CancellationFlag,
    ) -> Result<QualityReport> {
        let (files, parse_failures) =
            within(flag, AnalysisStage::Parsing, || Ok(self.parse_all(sources)))?;
        if files.is_empty() {
            return Err(QualityError::no_input(AnalysisStage::Parsing));
        }

        let complexity = within(flag, AnalysisStage::Complexity, || {
            ComplexityScorer::new(self.config.complexity.clone()).analyze(&files)
        })?;
        let duplication = within(flag, AnalysisStage::Duplication, || {
            let metrics = self.duplication.detect(&files);
            debug!(
                clusters = metrics.clusters.len(),
                percentage = metrics.duplication_percentage,
                "Duplication detection complete"
            );
            Ok(metrics)
        })?;
        let debt = within(flag, AnalysisStage::Debt, || {
            DebtScorer::new(self.config.debt.clone())
                .with_complexity(&complexity)
                .with_duplication(&duplication)
                .analyze(&files)
        })?;
        let testability = within(flag, AnalysisStage::Testability, || {
            Ok(TestabilityScorer::new(self.config.testability.clone())
                .analyze(&files, Some(&complexity)))
        })?;
        let performance = within(flag, AnalysisStage::Performance, || {
            let metrics = self.performance.analyze(&files, &complexity);
            debug!(
                anti_patterns = metrics.anti_patterns.len(),
                score = metrics.overall_score.value(),
                "Performance analysis complete"
            );
            Ok(metrics)
        })?;
        let maintainability = within(flag, AnalysisStage::Maintainability, || {
            Ok(MaintainabilityScorer::new(self.config.maintainability.clone())
                .analyze(&files, Some(&complexity)))
        })?;

        let inputs = ReportInputs::new()
            .files_analyzed(files.len())
            .parse_failures(parse_failures)
            .complexity(complexity)
            .duplication(duplication)
            .debt(debt)
            .testability(testability)
            .performance(performance)
            .maintainability(maintainability);
        within(flag, AnalysisStage::ReportAssembly, || {
            assemble(inputs, &self.config.report)
        })
    }

    fn parse_all(&self, sources: &BTreeMap<PathBuf, String>) -> (Vec<FileFacts>, Vec<ParseFailure>) {
        let parsed: Vec<(&PathBuf, Result<FileFacts>)> = sources
            .par_iter()
            .map(|(path, source)| (path, self.parser.parse(path, source)))
            .collect();

        let mut files = Vec::with_capacity(parsed.len());
        let mut failures = Vec::new();
        for (path, result) in parsed {
            match result {
                Ok(facts) => files.push(facts.with_path(path)),
                Err(err) => {
                    warn!(file = %path.display(), error = %err, "Skipping file that failed to parse");
                    let message = match err {
                        QualityError::Parse { message, .. } => message,
                        other => other.to_string(),
                    };
                    failures.push(ParseFailure {
                        file: path.clone(),
                        message,
                    });
                }
            }
        }

        debug!(
            parsed = files.len(),
            failed = failures.len(),
            "Parsing complete"
        );
        (files, failures)
    }
}

/// Run one stage inside its span after checking for cancellation.
fn within<T>(
    flag: &CancellationFlag,
    stage: AnalysisStage,
    work: impl FnOnce() -> Result<T>,
) -> Result<T> {
    flag.enter(stage)?;
    let _span = stage_span(stage).entered();
    work()
}
