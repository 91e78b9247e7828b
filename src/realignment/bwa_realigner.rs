use std::io::Write;
use std::path::{Path, PathBuf};

use bird_tool_utils::command::finish_command_safely;

use crate::external_command_checker;
use crate::realignment::realigner::{Realigner, RealignmentConfig, RealignmentOutcome};
use crate::reads::lyre_read::LyreRead;
use crate::utils::errors::LyrebirdError;

/// Extensions produced by `bwa index` alongside the reference stem.
const BWA_INDEX_EXTENSIONS: &[&str] = &["amb", "ann", "bwt", "pac", "sa"];

/**
 * A {@link Realigner} backed by an external `bwa mem` invocation against an index built from the
 * best available reference.  Each call writes the read to a scratch FASTA, aligns it, and
 * compares the primary placement with the read's original locus.
 *
 * TODO: batch the supporting reads of one variant into a single bwa invocation; the trait seam
 * already permits this without touching the pipeline.
 */
pub struct BwaRealigner {
    index_path: PathBuf,
    min_mapping_quality: u8,
    locus_shift_tolerance: i64,
    target_names: Vec<String>,
}

impl BwaRealigner {
    /**
     * Verifies the bwa executable and every index companion file before any variant is
     * processed; a missing index is fatal here, not at the first realignment.
     *
     * @param config        index path and thresholds
     * @param target_names  contig names of the bam the reads come from, indexed by tid
     */
    pub fn new(
        config: &RealignmentConfig,
        target_names: Vec<String>,
    ) -> Result<BwaRealigner, LyrebirdError> {
        external_command_checker::check_for_bwa();

        for extension in BWA_INDEX_EXTENSIONS {
            let companion = PathBuf::from(format!(
                "{}.{}",
                config.index_path.display(),
                extension
            ));
            if !companion.exists() {
                return Err(LyrebirdError::RealignerInitialization(format!(
                    "bwa index file {:?} not found; run `bwa index` on the realignment reference",
                    companion
                )));
            }
        }

        Ok(BwaRealigner {
            index_path: config.index_path.clone(),
            min_mapping_quality: config.min_mapping_quality,
            locus_shift_tolerance: config.locus_shift_tolerance,
            target_names,
        })
    }

    fn write_query_fasta(&self, read: &LyreRead) -> Result<tempfile::NamedTempFile, LyrebirdError> {
        let mut fasta = tempfile::Builder::new()
            .prefix("lyrebird-realign")
            .suffix(".fasta")
            .tempfile()
            .map_err(|e| {
                LyrebirdError::RealignmentInvocation(format!(
                    "Could not create scratch FASTA: {}",
                    e
                ))
            })?;
        writeln!(fasta, ">{}", String::from_utf8_lossy(read.name())).and_then(|_| {
            fasta.write_all(read.seq()).and_then(|_| writeln!(fasta))
        })
        .and_then(|_| fasta.flush())
        .map_err(|e| {
            LyrebirdError::RealignmentInvocation(format!(
                "Could not write scratch FASTA: {}",
                e
            ))
        })?;
        Ok(fasta)
    }

    fn run_bwa(&self, query: &Path) -> Result<String, LyrebirdError> {
        let sam_out = tempfile::Builder::new()
            .prefix("lyrebird-realign")
            .suffix(".sam")
            .tempfile()
            .map_err(|e| {
                LyrebirdError::RealignmentInvocation(format!(
                    "Could not create scratch SAM: {}",
                    e
                ))
            })?;

        let cmd_string = format!(
            "set -e -o pipefail; bwa mem -v 1 -t 1 {:?} {:?} > {:?}",
            self.index_path,
            query,
            sam_out.path()
        );
        debug!("Queuing cmd_string: {}", cmd_string);
        finish_command_safely(
            std::process::Command::new("bash")
                .arg("-c")
                .arg(&cmd_string)
                .stderr(std::process::Stdio::piped())
                .spawn()
                .expect("Unable to execute bash"),
            "bwa",
        );

        std::fs::read_to_string(sam_out.path()).map_err(|e| {
            LyrebirdError::RealignmentInvocation(format!("Could not read bwa output: {}", e))
        })
    }

    fn classify_placement(
        &self,
        read: &LyreRead,
        sam: &str,
    ) -> Result<RealignmentOutcome, LyrebirdError> {
        for line in sam.lines() {
            if line.starts_with('@') {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() < 5 {
                return Err(LyrebirdError::RealignmentInvocation(format!(
                    "Truncated alignment record from bwa: {}",
                    line
                )));
            }
            let flag: u16 = fields[1].parse().map_err(|_| {
                LyrebirdError::RealignmentInvocation(format!(
                    "Unparseable SAM flag from bwa: {}",
                    fields[1]
                ))
            })?;
            if flag & 0x900 != 0 {
                // secondary or supplementary placement; the primary decides
                continue;
            }
            if flag & 0x4 != 0 {
                return Ok(RealignmentOutcome::Failed);
            }
            let mapq: u8 = fields[4].parse().map_err(|_| {
                LyrebirdError::RealignmentInvocation(format!(
                    "Unparseable mapping quality from bwa: {}",
                    fields[4]
                ))
            })?;
            if mapq < self.min_mapping_quality {
                return Ok(RealignmentOutcome::Ambiguous);
            }
            let pos: i64 = fields[3].parse().map_err(|_| {
                LyrebirdError::RealignmentInvocation(format!(
                    "Unparseable position from bwa: {}",
                    fields[3]
                ))
            })?;

            let original_tid = read.read.tid();
            let original_name = self
                .target_names
                .get(original_tid.max(0) as usize)
                .filter(|_| original_tid >= 0)
                .ok_or_else(|| {
                    LyrebirdError::MalformedRead(format!(
                        "Read {} has no resolvable contig (tid {})",
                        String::from_utf8_lossy(read.name()),
                        original_tid
                    ))
                })?;

            // SAM text positions are 1-based
            let same_locus = fields[2] == original_name.as_str()
                && ((pos - 1) - read.read.pos()).abs() <= self.locus_shift_tolerance;
            return Ok(if same_locus {
                RealignmentOutcome::ConfidentAtOriginalLocus
            } else {
                RealignmentOutcome::Discordant
            });
        }

        Err(LyrebirdError::RealignmentInvocation(format!(
            "bwa produced no alignment record for read {}",
            String::from_utf8_lossy(read.name())
        )))
    }
}

impl Realigner for BwaRealigner {
    fn realign(&self, read: &LyreRead) -> Result<RealignmentOutcome, LyrebirdError> {
        if read.is_empty() {
            return Ok(RealignmentOutcome::Failed);
        }
        let query = self.write_query_fasta(read)?;
        let sam = self.run_bwa(query.path())?;
        self.classify_placement(read, &sam)
    }
}
