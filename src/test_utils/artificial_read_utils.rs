use std::convert::TryFrom;

use rust_htslib::bam::record::{CigarString, Record};

use crate::reads::lyre_read::LyreRead;

pub static DEFAULT_SAMPLE_NAME: &str = "SampleX";

pub struct ArtificialReadUtils {}

impl ArtificialReadUtils {
    pub const DEFAULT_MAPQ: u8 = 60;

    /**
     * Build a mapped read directly from its coordinates and cigar; base qualities are constant
     * since nothing in this crate consumes them.
     */
    pub fn create_artificial_read(
        name: &str,
        tid: i32,
        alignment_start: i64,
        bases: &[u8],
        cigar: &str,
        sample_name: &str,
    ) -> LyreRead {
        let mut record = Record::new();
        record.set(
            name.as_bytes(),
            Some(&CigarString::try_from(cigar).expect("Test cigar must parse")),
            bases,
            &vec![30u8; bases.len()],
        );
        record.set_tid(tid);
        record.set_pos(alignment_start);
        record.set_mapq(Self::DEFAULT_MAPQ);
        record.unset_unmapped();

        LyreRead::new(record, sample_name.to_string())
    }

    /**
     * An all-`A` read of the given length aligned without gaps at the given position.
     */
    pub fn create_artificial_read_default(
        name: &str,
        tid: i32,
        alignment_start: i64,
        length: usize,
    ) -> LyreRead {
        let bases = vec![b'A'; length];
        let cigar = format!("{}M", length);
        Self::create_artificial_read(
            name,
            tid,
            alignment_start,
            &bases,
            &cigar,
            DEFAULT_SAMPLE_NAME,
        )
    }
}
