use crate::model::byte_array_allele::ByteArrayAllele;

/**
 * A single sample's call at one variant site.  Only the fields this tool consumes are carried:
 * the sample name, the called alleles, and the standard depth/quality annotations.
 */
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Genotype {
    pub sample_name: String,
    pub alleles: Vec<ByteArrayAllele>,
    pub dp: i64,
    pub gq: i64,
}

impl Genotype {
    pub fn build_from_alleles(alleles: Vec<ByteArrayAllele>, sample_name: String) -> Genotype {
        Genotype {
            sample_name,
            alleles,
            dp: -1,
            gq: -1,
        }
    }

    pub fn get_ploidy(&self) -> usize {
        self.alleles.len()
    }

    /**
     * True iff the genotype is called and every allele is the reference allele.  No-call
     * genotypes are not homozygous-reference: absence of a call is not evidence of absence, so
     * their samples stay eligible for support evaluation.
     */
    pub fn is_hom_ref(&self) -> bool {
        !self.alleles.is_empty()
            && self
                .alleles
                .iter()
                .all(|a| a.is_reference())
    }

    pub fn is_no_call(&self) -> bool {
        self.alleles.is_empty() || self.alleles.iter().all(|a| a.is_no_call())
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct GenotypesContext {
    genotypes: Vec<Genotype>,
}

impl GenotypesContext {
    pub fn empty() -> GenotypesContext {
        GenotypesContext {
            genotypes: Vec::new(),
        }
    }

    pub fn create(size: usize) -> GenotypesContext {
        GenotypesContext {
            genotypes: Vec::with_capacity(size),
        }
    }

    pub fn new(genotypes: Vec<Genotype>) -> GenotypesContext {
        GenotypesContext { genotypes }
    }

    pub fn add(&mut self, genotype: Genotype) {
        self.genotypes.push(genotype)
    }

    pub fn is_empty(&self) -> bool {
        self.genotypes.is_empty()
    }

    pub fn size(&self) -> usize {
        self.genotypes.len()
    }

    pub fn genotypes(&self) -> &[Genotype] {
        &self.genotypes
    }
}
