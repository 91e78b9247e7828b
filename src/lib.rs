#[macro_use]
extern crate log;

pub mod cli;
pub mod external_command_checker;
pub mod genotype;
pub mod model;
pub mod processing;
pub mod reads;
pub mod realignment;
pub mod test_utils;
pub mod utils;
