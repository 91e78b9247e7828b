use crate::utils::errors::LyrebirdError;

/**
 * An allele as a byte sequence.  The first allele of a variant is the reference allele; alternates
 * follow in declaration order.  No-call and symbolic alleles are representable but carry no bases
 * that can be matched against a read.
 */
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ByteArrayAllele {
    pub(crate) is_ref: bool,
    is_no_call: bool,
    is_symbolic: bool,
    pub(crate) bases: Vec<u8>,
}

impl ByteArrayAllele {
    pub fn new(bases: &[u8], is_ref: bool) -> Result<ByteArrayAllele, LyrebirdError> {
        if Self::would_be_null_allele(bases) {
            return Err(LyrebirdError::MalformedVariant(
                "Null alleles are not supported".to_string(),
            ));
        }

        if Self::would_be_no_call_allele(bases) {
            if is_ref {
                return Err(LyrebirdError::MalformedVariant(
                    "Cannot tag a no-call allele as the reference allele".to_string(),
                ));
            }
            return Ok(ByteArrayAllele {
                bases: Vec::new(),
                is_ref: false,
                is_no_call: true,
                is_symbolic: false,
            });
        }

        if Self::would_be_symbolic_allele(bases) {
            if is_ref {
                return Err(LyrebirdError::MalformedVariant(
                    "Cannot tag a symbolic allele as the reference allele".to_string(),
                ));
            }
            return Ok(ByteArrayAllele {
                bases: bases.to_vec(),
                is_ref: false,
                is_no_call: false,
                is_symbolic: true,
            });
        }

        if !Self::acceptable_allele_bases(bases) {
            return Err(LyrebirdError::MalformedVariant(format!(
                "Unexpected base in allele bases {}",
                String::from_utf8_lossy(bases)
            )));
        }

        Ok(ByteArrayAllele {
            bases: bases.to_ascii_uppercase(),
            is_ref,
            is_no_call: false,
            is_symbolic: false,
        })
    }

    fn would_be_null_allele(bases: &[u8]) -> bool {
        bases.is_empty() || bases == b"-"
    }

    fn would_be_no_call_allele(bases: &[u8]) -> bool {
        bases == b"." || bases == b"N/A"
    }

    fn would_be_symbolic_allele(bases: &[u8]) -> bool {
        if bases.len() <= 1 {
            // the spanning-deletion placeholder has no concrete bases either
            return bases == b"*";
        }
        bases[0] == b'<'
            || bases[bases.len() - 1] == b'>'
            || bases.contains(&b'[')
            || bases.contains(&b']')
            || bases.contains(&b'.')
    }

    fn acceptable_allele_bases(bases: &[u8]) -> bool {
        bases
            .iter()
            .all(|b| matches!(b.to_ascii_uppercase(), b'A' | b'C' | b'G' | b'T' | b'N'))
    }

    /**
     * Symbolic and no-call alleles have no concrete length on the reference.
     */
    pub fn len(&self) -> usize {
        if self.is_symbolic || self.is_no_call {
            0
        } else {
            self.bases.len()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_reference(&self) -> bool {
        self.is_ref
    }

    pub fn is_no_call(&self) -> bool {
        self.is_no_call
    }

    pub fn is_symbolic(&self) -> bool {
        self.is_symbolic
    }

    pub fn get_bases(&self) -> &[u8] {
        &self.bases
    }

    /**
     * Exact byte-for-byte comparison against a window of read bases, case-insensitive on the read
     * side.  Symbolic and no-call alleles never match.
     */
    pub fn bases_match(&self, test: &[u8]) -> bool {
        if self.is_symbolic || self.is_no_call {
            return false;
        }
        self.bases.len() == test.len()
            && self
                .bases
                .iter()
                .zip(test.iter())
                .all(|(a, b)| *a == b.to_ascii_uppercase())
    }
}
