pub mod byte_array_allele;
pub mod variant_context;
