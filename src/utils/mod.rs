pub mod errors;
pub mod simple_interval;
pub mod vcf_constants;
