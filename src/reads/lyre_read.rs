use rust_htslib::bam::record::{Cigar, Record};

use crate::reads::cigar_utils::CigarUtils;
use crate::utils::simple_interval::Locatable;

/**
 * Unified read interface used throughout lyrebird.
 *
 * Wraps a rust_htslib {@link Record} together with the originating sample name (resolved from the
 * read group's SM field) and a cached copy of the base sequence, since {@link Record::seq} decodes
 * on every call.
 */
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct LyreRead {
    pub read: Record,
    pub sample_name: String,
    pub bases: Vec<u8>,
}

impl LyreRead {
    pub fn new(read: Record, sample_name: String) -> LyreRead {
        let bases = read.seq().as_bytes();
        LyreRead {
            read,
            sample_name,
            bases,
        }
    }

    pub fn seq(&self) -> &[u8] {
        self.bases.as_slice()
    }

    pub fn name(&self) -> &[u8] {
        self.read.qname()
    }

    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn mapq(&self) -> u8 {
        self.read.mapq()
    }

    /**
     * Calculates the reference coordinate for the beginning of the read taking into account soft
     * clips but not hard clips.  May be negative when a leading soft clip extends past the start
     * of the contig, hence the i64 return.
     */
    pub fn get_soft_start_i64(&self) -> i64 {
        let mut start = self.read.pos();
        for cig in self.read.cigar().iter() {
            match cig {
                Cigar::SoftClip(len) => start -= *len as i64,
                Cigar::HardClip(_) => continue,
                _ => break,
            }
        }
        start
    }
}

impl Locatable for LyreRead {
    fn tid(&self) -> i32 {
        self.read.tid()
    }

    fn get_start(&self) -> usize {
        self.read.pos() as usize
    }

    fn get_end(&self) -> usize {
        self.get_start()
            + (CigarUtils::get_reference_length(&self.read.cigar()) as usize)
                .saturating_sub(1)
    }

    fn get_length_on_reference(&self) -> usize {
        CigarUtils::get_reference_length(&self.read.cigar()) as usize
    }
}
