use std::collections::HashSet;

use rayon::prelude::*;

use crate::model::variant_context::VariantContext;
use crate::realignment::realigner::{Realigner, RealignmentOutcome};
use crate::realignment::variant_support::SupportClassifier;
use crate::reads::lyre_read::LyreRead;
use crate::utils::errors::LyrebirdError;
use crate::utils::vcf_constants::VCFConstants;

/**
 * How many supporting reads must fail to realign confidently before a variant is called an
 * alignment artifact.  Count mode compares against an absolute number of reads; fraction mode
 * against a proportion of the supporting reads.
 */
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArtifactThreshold {
    Count(usize),
    Fraction(f64),
}

impl ArtifactThreshold {
    pub fn validate(&self) -> Result<(), LyrebirdError> {
        match self {
            ArtifactThreshold::Count(n) if *n == 0 => Err(LyrebirdError::InvalidConfiguration(
                "discordant read count threshold must be >= 1".to_string(),
            )),
            ArtifactThreshold::Fraction(f) if !(*f > 0.0 && *f <= 1.0) => {
                Err(LyrebirdError::InvalidConfiguration(format!(
                    "discordant fraction threshold must be in (0, 1], got {}",
                    f
                )))
            }
            _ => Ok(()),
        }
    }

    fn is_met(&self, non_confident: usize, supporting: usize) -> bool {
        match self {
            ArtifactThreshold::Count(n) => non_confident >= *n,
            ArtifactThreshold::Fraction(f) => non_confident as f64 >= f * supporting as f64,
        }
    }
}

/// Commutative per-category tally of realignment outcomes for one variant.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct RealignmentTally {
    pub confident: usize,
    pub discordant: usize,
    pub ambiguous: usize,
    pub failed: usize,
}

impl RealignmentTally {
    pub fn new() -> RealignmentTally {
        Default::default()
    }

    pub fn record(&mut self, outcome: RealignmentOutcome) {
        match outcome {
            RealignmentOutcome::ConfidentAtOriginalLocus => self.confident += 1,
            RealignmentOutcome::Discordant => self.discordant += 1,
            RealignmentOutcome::Ambiguous => self.ambiguous += 1,
            RealignmentOutcome::Failed => self.failed += 1,
        }
    }

    pub fn supporting(&self) -> usize {
        self.confident + self.non_confident()
    }

    /// Every outcome other than a confident placement at the original locus.
    pub fn non_confident(&self) -> usize {
        self.discordant + self.ambiguous + self.failed
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Verdict {
    Pass,
    AlignmentArtifact,
}

/// Per-variant decision plus the outcome counts that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterVerdict {
    pub verdict: Verdict,
    pub tally: RealignmentTally,
}

impl FilterVerdict {
    pub fn pass(tally: RealignmentTally) -> FilterVerdict {
        FilterVerdict {
            verdict: Verdict::Pass,
            tally,
        }
    }

    pub fn is_filtered(&self) -> bool {
        self.verdict == Verdict::AlignmentArtifact
    }
}

/**
 * The per-variant pipeline: select reads from variant-carrying samples, classify each for allele
 * support, realign the supporters against the secondary reference, and aggregate the outcomes
 * into a verdict.  One output record is produced per input variant, in input order; inputs are
 * never mutated.
 */
pub struct RealignmentArtifactFilter<R: Realigner> {
    classifier: SupportClassifier,
    realigner: R,
    threshold: ArtifactThreshold,
    variants_seen: usize,
    variants_filtered: usize,
}

impl<R: Realigner> RealignmentArtifactFilter<R> {
    pub fn new(
        classifier: SupportClassifier,
        realigner: R,
        threshold: ArtifactThreshold,
    ) -> Result<RealignmentArtifactFilter<R>, LyrebirdError> {
        threshold.validate()?;
        Ok(RealignmentArtifactFilter {
            classifier,
            realigner,
            threshold,
            variants_seen: 0,
            variants_filtered: 0,
        })
    }

    pub fn start(&mut self) {
        self.variants_seen = 0;
        self.variants_filtered = 0;
        debug!("Artifact filter pipeline started");
    }

    /**
     * Process one variant against the reads overlapping it.  Returns the annotated output copy
     * and the verdict.  An `Err` from the realigner is an invocation failure and is propagated;
     * it must never be downgraded to a PASS.
     */
    pub fn process_variant(
        &mut self,
        vc: &VariantContext,
        reads: &[LyreRead],
    ) -> Result<(VariantContext, FilterVerdict), LyrebirdError> {
        self.variants_seen += 1;

        // sites with no alternate allele pass through untouched
        if vc.get_alternate_alleles().is_empty() {
            return Ok((vc.clone(), FilterVerdict::pass(RealignmentTally::new())));
        }

        let variant_samples: HashSet<&str> = vc
            .get_genotypes()
            .genotypes()
            .iter()
            .filter(|g| !g.is_hom_ref())
            .map(|g| g.sample_name.as_str())
            .collect();

        let supporting_reads: Vec<&LyreRead> = reads
            .iter()
            .filter(|read| variant_samples.contains(read.sample_name.as_str()))
            .filter(|read| self.classifier.supports_variant(read, vc))
            .collect();

        let outcomes: Vec<RealignmentOutcome> = supporting_reads
            .par_iter()
            .map(|read| self.realigner.realign(read))
            .collect::<Result<Vec<RealignmentOutcome>, LyrebirdError>>()?;

        let mut tally = RealignmentTally::new();
        for outcome in outcomes {
            tally.record(outcome);
        }

        let filtered =
            tally.supporting() > 0 && self.threshold.is_met(tally.non_confident(), tally.supporting());

        let mut output = vc.clone();
        let verdict = if filtered {
            self.variants_filtered += 1;
            output.filter(VCFConstants::ALIGNMENT_ARTIFACT_FILTER_NAME.to_string());
            FilterVerdict {
                verdict: Verdict::AlignmentArtifact,
                tally,
            }
        } else {
            FilterVerdict::pass(tally)
        };

        Ok((output, verdict))
    }

    pub fn finish(&self) {
        info!(
            "Processed {} variants, filtered {} as alignment artifacts",
            self.variants_seen, self.variants_filtered
        );
    }

    pub fn variants_seen(&self) -> usize {
        self.variants_seen
    }

    pub fn variants_filtered(&self) -> usize {
        self.variants_filtered
    }
}
