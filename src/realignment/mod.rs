pub mod artifact_filter;
pub mod bwa_realigner;
pub mod realigner;
pub mod variant_support;
