use super::search::{ensure_target_size, search_target};
use crate::core::io::shared::{PulledTarget, SharedSource};
use crate::core::io::traits::{InMemorySource, StructureSource};
use crate::core::models::system::MolecularSystem;
use crate::engine::config::SearchConfig;
use crate::engine::context::{PreparedQuery, SearchContext};
use crate::engine::error::EngineError;
use crate::engine::matches::MatchSet;
use crate::engine::motif::QueryMotif;
use crate::engine::progress::{Progress, ProgressReporter};
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, info, instrument, warn};

/// Why a target of a batch produced no result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The structure source failed to provide the target.
    Source(String),
    /// A pre-filter rejected the target before searching.
    Filtered(String),
    /// The search itself failed, or panicked inside a caller-supplied predicate.
    Failed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Source(message) => write!(f, "source error: {}", message),
            SkipReason::Filtered(message) => write!(f, "filtered: {}", message),
            SkipReason::Failed(message) => write!(f, "search failed: {}", message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedTarget {
    /// Position of the target in the source.
    pub index: usize,
    /// Label of the target, if it could be read.
    pub label: Option<String>,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    /// Matches of every searched target, merged in RMSD order.
    pub matches: MatchSet,
    /// Targets without a result, in source order.
    pub skipped: Vec<SkippedTarget>,
    /// Number of targets taken from the source.
    pub processed: usize,
}

impl BatchResult {
    /// Number of targets that were searched to completion.
    pub fn searched(&self) -> usize {
        self.processed - self.skipped.len()
    }
}

enum TargetOutcome {
    Searched { index: usize, matches: MatchSet },
    Skipped(SkippedTarget),
}

impl TargetOutcome {
    fn index(&self) -> usize {
        match self {
            TargetOutcome::Searched { index, .. } => *index,
            TargetOutcome::Skipped(skipped) => skipped.index,
        }
    }
}

/// A motif search over a stream of targets, run by a pool of workers.
///
/// Failures of individual targets never abort the batch: they are logged and
/// recorded in [`BatchResult::skipped`]. This includes panics raised by custom
/// atom filters or representation schemes while a target is searched.
#[derive(Debug, Clone)]
pub struct BatchSearch {
    motif: QueryMotif,
    config: SearchConfig,
    query: PreparedQuery,
}

impl BatchSearch {
    /// Validates the configuration and prepares the motif geometry once for all targets.
    pub fn new(motif: &QueryMotif, config: SearchConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let query = PreparedQuery::new(motif, &config)?;
        Ok(Self {
            motif: motif.clone(),
            config,
            query,
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Searches every target of `source`.
    pub fn run<S: StructureSource>(&self, source: S, reporter: &ProgressReporter) -> BatchResult {
        self.run_shared(&SharedSource::new(source), reporter)
    }

    /// Searches targets pulled from `source` until it is exhausted or stopped.
    #[instrument(skip_all, name = "batch_search_workflow", fields(workers = self.worker_count()))]
    pub fn run_shared<S: StructureSource>(
        &self,
        source: &SharedSource<S>,
        reporter: &ProgressReporter,
    ) -> BatchResult {
        reporter.report(Progress::PhaseStart {
            name: "Batch Search",
        });
        reporter.report(Progress::TaskStart {
            total_steps: source.remaining_hint().unwrap_or(0) as u64,
        });
        info!("Starting batch search.");

        let mut outcomes = self.collect_outcomes(source, reporter);
        outcomes.sort_by_key(TargetOutcome::index);

        let processed = outcomes.len();
        let mut skipped = Vec::new();
        let mut found = Vec::new();
        for outcome in outcomes {
            match outcome {
                TargetOutcome::Searched { matches, .. } => found.push(matches),
                TargetOutcome::Skipped(target) => skipped.push(target),
            }
        }
        let result = BatchResult {
            matches: found.into_iter().collect(),
            skipped,
            processed,
        };

        reporter.report(Progress::TaskFinish);
        reporter.report(Progress::PhaseFinish);
        info!(
            processed = result.processed,
            skipped = result.skipped.len(),
            "Batch complete. Returning {} match(es).",
            result.matches.len()
        );
        result
    }

    fn worker_count(&self) -> usize {
        if cfg!(feature = "parallel") {
            self.config.parallelism.max(1)
        } else {
            1
        }
    }

    #[cfg(feature = "parallel")]
    fn collect_outcomes<S: StructureSource>(
        &self,
        source: &SharedSource<S>,
        reporter: &ProgressReporter,
    ) -> Vec<TargetOutcome> {
        match rayon::ThreadPoolBuilder::new()
            .num_threads(self.worker_count())
            .build()
        {
            Ok(pool) => pool
                .broadcast(|_| self.worker_loop(source, reporter))
                .into_iter()
                .flatten()
                .collect(),
            Err(e) => {
                warn!(error = %e, "Could not build worker pool; searching on the calling thread.");
                self.worker_loop(source, reporter)
            }
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn collect_outcomes<S: StructureSource>(
        &self,
        source: &SharedSource<S>,
        reporter: &ProgressReporter,
    ) -> Vec<TargetOutcome> {
        self.worker_loop(source, reporter)
    }

    fn worker_loop<S: StructureSource>(
        &self,
        source: &SharedSource<S>,
        reporter: &ProgressReporter,
    ) -> Vec<TargetOutcome> {
        let silent = ProgressReporter::new();
        let context = SearchContext::new(&self.motif, &self.query, &self.config, &silent);
        let mut outcomes = Vec::new();

        while let Some(pulled) = source.pull() {
            let outcome = self.process_target(&context, pulled);
            match &outcome {
                TargetOutcome::Searched { index, matches } => {
                    reporter.report(Progress::TargetFinished {
                        index: *index,
                        matches: matches.len(),
                    })
                }
                TargetOutcome::Skipped(skipped) => reporter.report(Progress::TargetSkipped {
                    index: skipped.index,
                    reason: skipped.reason.to_string(),
                }),
            }
            reporter.report(Progress::TaskIncrement);
            outcomes.push(outcome);
        }
        outcomes
    }

    fn process_target(&self, context: &SearchContext, pulled: PulledTarget) -> TargetOutcome {
        let index = pulled.index;
        let target = match pulled.structure {
            Ok(target) => target,
            Err(e) => {
                warn!(index, error = %e, "Skipping target: structure could not be obtained.");
                return TargetOutcome::Skipped(SkippedTarget {
                    index,
                    label: None,
                    reason: SkipReason::Source(e.to_string()),
                });
            }
        };
        let label = target.label().to_string();

        if let Some(reason) = self.config.target_filter.rejects(&target) {
            info!(index, target = %label, reason, "Skipping target rejected by pre-filter.");
            return TargetOutcome::Skipped(SkippedTarget {
                index,
                label: Some(label),
                reason: SkipReason::Filtered(reason.to_string()),
            });
        }

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            ensure_target_size(&self.motif, &target)
                .map_err(EngineError::from)
                .and_then(|()| search_target(context, target, index))
        }))
        .unwrap_or_else(|payload| {
            Err(EngineError::Internal(format!(
                "panicked: {}",
                panic_message(payload.as_ref())
            )))
        });
        match result {
            Ok(matches) => {
                debug!(index, target = %label, matches = matches.len(), "Target searched.");
                TargetOutcome::Searched { index, matches }
            }
            Err(e) => {
                warn!(index, target = %label, error = %e, "Skipping target: search failed.");
                TargetOutcome::Skipped(SkippedTarget {
                    index,
                    label: Some(label),
                    reason: SkipReason::Failed(e.to_string()),
                })
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

/// Searches every structure of `targets` for `motif`.
pub fn run<I>(
    motif: &QueryMotif,
    targets: I,
    config: &SearchConfig,
    reporter: &ProgressReporter,
) -> Result<BatchResult, EngineError>
where
    I: IntoIterator<Item = MolecularSystem>,
{
    let batch = BatchSearch::new(motif, config.clone())?;
    let source: InMemorySource = targets.into_iter().collect();
    Ok(batch.run(source, reporter))
}
