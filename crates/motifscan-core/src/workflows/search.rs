use crate::core::models::system::MolecularSystem;
use crate::engine::config::{ConfigError, SearchConfig};
use crate::engine::context::{PreparedQuery, SearchContext};
use crate::engine::distance::DistanceMatrix;
use crate::engine::error::EngineError;
use crate::engine::matches::{Match, MatchCollector, MatchSet, MatchedResidue};
use crate::engine::motif::QueryMotif;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::superposition::{Superimposition, superimpose};
use crate::engine::tasks::alignments::{Alignment, enumerate_alignments};
use crate::engine::tasks::candidates::CandidateGenerator;
use crate::engine::tasks::environment::{compose_environments, reduce_target};
use nalgebra::Point3;
use tracing::{debug, info, instrument};

/// A validated search of one query motif against one target structure.
///
/// Construction copies motif and target; running the search never mutates
/// anything the caller holds.
#[derive(Debug, Clone)]
pub struct MotifSearch {
    motif: QueryMotif,
    target: MolecularSystem,
    config: SearchConfig,
    query: PreparedQuery,
}

impl MotifSearch {
    /// Validates the configuration and prepares the motif geometry.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] for an invalid configuration or a target
    /// with fewer residues than the motif, and [`EngineError::Geometry`] if a
    /// motif residue has no reference point.
    pub fn new(
        motif: &QueryMotif,
        target: &MolecularSystem,
        config: SearchConfig,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        ensure_target_size(motif, target)?;
        let query = PreparedQuery::new(motif, &config)?;
        Ok(Self {
            motif: motif.clone(),
            target: target.clone(),
            config,
            query,
        })
    }

    pub fn motif(&self) -> &QueryMotif {
        &self.motif
    }

    pub fn target(&self) -> &MolecularSystem {
        &self.target
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    #[instrument(skip_all, name = "motif_search_workflow", fields(target = %self.target.label()))]
    pub fn run(&self, reporter: &ProgressReporter) -> Result<MatchSet, EngineError> {
        let context = SearchContext::new(&self.motif, &self.query, &self.config, reporter);
        let matches = search_target(&context, self.target.clone(), 0)?;
        info!(
            "Search complete. Returning {} match(es).",
            matches.len()
        );
        Ok(matches)
    }
}

/// Searches `target` for `motif` in one call.
pub fn run(
    motif: &QueryMotif,
    target: &MolecularSystem,
    config: &SearchConfig,
    reporter: &ProgressReporter,
) -> Result<MatchSet, EngineError> {
    MotifSearch::new(motif, target, config.clone())?.run(reporter)
}

pub(crate) fn ensure_target_size(
    motif: &QueryMotif,
    target: &MolecularSystem,
) -> Result<(), ConfigError> {
    if target.residue_count() < motif.len() {
        return Err(ConfigError::TargetTooSmall {
            target: target.label().to_string(),
            target_size: target.residue_count(),
            motif_size: motif.len(),
        });
    }
    Ok(())
}

/// Runs the full single-target pipeline on a private working copy.
pub(crate) fn search_target(
    context: &SearchContext,
    mut target: MolecularSystem,
    target_index: usize,
) -> Result<MatchSet, EngineError> {
    let reporter = context.reporter;
    let motif_size = context.query.len();

    // === Phase 1: Reduce the target to residues the motif can use ===
    reporter.phase("Target Reduction", || {
        reduce_target(&mut target, &context.query.families)
    });
    let residue_ids = target.ordered_residue_ids();
    if residue_ids.len() < motif_size {
        info!(
            remaining = residue_ids.len(),
            motif_size, "Too few compatible residues after reduction; no matches possible."
        );
        return Ok(MatchSet::new());
    }

    // === Phase 2: Pairwise distances between reference points ===
    let matrix = reporter.phase("Distance Matrix", || {
        DistanceMatrix::compute(&target, &residue_ids, &context.config.reference)
    })?;

    // === Phase 3: Environments around every residue ===
    let environments = reporter.phase("Environments", || {
        compose_environments(&matrix, context.environment_radius_squared(), motif_size)
    });

    // === Phase 4: Candidates, alignments and superimposition ===
    reporter.report(Progress::PhaseStart { name: "Matching" });
    reporter.report(Progress::TaskStart {
        total_steps: environments.len() as u64,
    });

    let mut generator = CandidateGenerator::new(&context.query.allowed);
    let mut collector = MatchCollector::new(context.config.rmsd_cutoff, target_index);
    let mut alignments_fitted = 0usize;

    for environment in &environments {
        for candidate in generator.generate(&target, environment) {
            for alignment in enumerate_alignments(&context.query.allowed, &candidate, &target) {
                let mobile = alignment_points(&matrix, &alignment)?;
                let fit = superimpose(&context.query.points, &mobile)?;
                alignments_fitted += 1;
                if collector.admits(fit.rmsd) {
                    collector.offer(build_match(&target, &alignment, fit)?);
                }
            }
        }
        reporter.report(Progress::TaskIncrement);
    }

    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);

    debug!(
        environments = environments.len(),
        candidates = generator.produced(),
        alignments = alignments_fitted,
        matches = collector.accepted(),
        "Matching finished."
    );
    Ok(collector.finish())
}

fn alignment_points(
    matrix: &DistanceMatrix,
    alignment: &Alignment,
) -> Result<Vec<Point3<f64>>, EngineError> {
    alignment
        .assignment
        .iter()
        .map(|&id| {
            matrix.reference_point(id).copied().ok_or_else(|| {
                EngineError::Internal(format!("residue {id:?} missing from distance matrix"))
            })
        })
        .collect()
}

fn build_match(
    target: &MolecularSystem,
    alignment: &Alignment,
    superimposition: Superimposition,
) -> Result<Match, EngineError> {
    let residues = alignment
        .assignment
        .iter()
        .enumerate()
        .map(|(position, &id)| {
            let residue = target.residue(id);
            let key = target.residue_key(id);
            match (residue, key) {
                (Some(residue), Some(key)) => Ok(MatchedResidue {
                    position,
                    key,
                    family: residue.family.clone(),
                }),
                _ => Err(EngineError::Internal(format!(
                    "aligned residue {id:?} missing from target"
                ))),
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Match {
        target: target.label().to_string(),
        rmsd: superimposition.rmsd,
        residues,
        superimposition,
    })
}
