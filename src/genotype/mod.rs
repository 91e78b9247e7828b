pub mod genotype_builder;
