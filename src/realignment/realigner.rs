use std::path::PathBuf;

use crate::reads::lyre_read::LyreRead;
use crate::utils::errors::LyrebirdError;

/**
 * Category of a single read's realignment against the higher-fidelity reference.  `Failed` is a
 * valid outcome (the aligner produced no placement); an `Err` from {@link Realigner::realign} is
 * an invocation failure and aborts the run.
 */
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum RealignmentOutcome {
    ConfidentAtOriginalLocus,
    Discordant,
    Ambiguous,
    Failed,
}

/**
 * Configuration for realignment collaborators.
 */
#[derive(Debug, Clone)]
pub struct RealignmentConfig {
    /// Stem of the secondary reference index (e.g. a bwa index prefix).
    pub index_path: PathBuf,
    /// Placements below this mapping quality are not trusted either way.
    pub min_mapping_quality: u8,
    /// How far a realigned start may drift from the original and still count
    /// as the same locus.
    pub locus_shift_tolerance: i64,
}

impl RealignmentConfig {
    pub const DEFAULT_MIN_MAPPING_QUALITY: u8 = 30;
    pub const DEFAULT_LOCUS_SHIFT_TOLERANCE: i64 = 100;
}

/**
 * A pluggable realignment capability.  Implementations own the alignment algorithm entirely; the
 * filter pipeline only consumes the outcome category.  Calls must be safe to issue concurrently.
 */
pub trait Realigner: Sync {
    fn realign(&self, read: &LyreRead) -> Result<RealignmentOutcome, LyrebirdError>;
}
