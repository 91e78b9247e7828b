use std::collections::HashSet;

use crate::genotype::genotype_builder::GenotypesContext;
use crate::model::byte_array_allele::ByteArrayAllele;
use crate::utils::simple_interval::{Locatable, SimpleInterval};

/**
 * One called variant site: locus, alleles (reference first, alternates in declaration order) and
 * per-sample genotypes.  Instances handed to the filter pipeline are read-only; annotated output
 * records are fresh copies.
 */
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct VariantContext {
    pub loc: SimpleInterval,
    pub alleles: Vec<ByteArrayAllele>,
    pub genotypes: GenotypesContext,
    pub source: String,
    pub filters: HashSet<String>,
}

impl VariantContext {
    pub fn build(
        tid: usize,
        start: usize,
        end: usize,
        alleles: Vec<ByteArrayAllele>,
    ) -> VariantContext {
        assert!(
            !alleles.is_empty(),
            "A variant context requires at least a reference allele"
        );
        VariantContext {
            loc: SimpleInterval::new(tid, start, end),
            alleles,
            genotypes: GenotypesContext::empty(),
            source: "".to_string(),
            filters: HashSet::new(),
        }
    }

    pub fn add_genotypes(&mut self, genotypes: GenotypesContext) {
        self.genotypes = genotypes;
    }

    pub fn add_source(&mut self, source: String) {
        self.source = source;
    }

    pub fn get_n_alleles(&self) -> usize {
        self.alleles.len()
    }

    pub fn get_n_samples(&self) -> usize {
        self.genotypes.size()
    }

    pub fn get_reference(&self) -> &ByteArrayAllele {
        &self.alleles[0]
    }

    pub fn get_alternate_alleles(&self) -> &[ByteArrayAllele] {
        &self.alleles[1..]
    }

    pub fn get_genotypes(&self) -> &GenotypesContext {
        &self.genotypes
    }

    pub fn filter(&mut self, filter: String) {
        self.filters.insert(filter);
    }

    pub fn is_filtered(&self) -> bool {
        !self.filters.is_empty()
    }

    pub fn get_start(&self) -> usize {
        self.loc.get_start()
    }

    pub fn get_end(&self) -> usize {
        self.loc.get_end()
    }
}
