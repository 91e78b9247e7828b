pub mod lyrebird_engine;
