extern crate lyrebird;

use lyrebird::cli::*;
use lyrebird::processing::lyrebird_engine;

extern crate clap;
use clap::*;

#[macro_use]
extern crate log;
extern crate env_logger;
use env_logger::Builder;
use log::LevelFilter;

use std::env;
use std::process;

fn main() {
    let app = build_cli();
    let matches = app.get_matches();

    match matches.subcommand_name() {
        Some("filter") => {
            let m = matches.subcommand_matches("filter").unwrap();
            if m.is_present("full-help") {
                println!("{}", filter_full_help());
                process::exit(1);
            }
            set_log_level(m, true);

            let threads = value_t!(m.value_of("threads"), usize).unwrap_or_else(|e| e.exit());
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build_global()
                .unwrap();

            match lyrebird_engine::run_filter(m) {
                Ok(()) => {
                    info!("Finished filtering alignment artifacts");
                }
                Err(e) => {
                    error!("{}", e);
                    process::exit(1);
                }
            }
        }
        _ => {
            build_cli().print_help().unwrap();
            println!();
            process::exit(1);
        }
    }
}

fn set_log_level(matches: &clap::ArgMatches, is_last: bool) {
    let mut log_level = LevelFilter::Info;
    let mut specified = false;
    if matches.is_present("verbose") {
        specified = true;
        log_level = LevelFilter::Debug;
    }
    if matches.is_present("quiet") {
        specified = true;
        log_level = LevelFilter::Error;
    }
    if specified || is_last {
        let mut builder = Builder::new();
        builder.filter_level(log_level);
        if env::var("RUST_LOG").is_ok() {
            builder.parse_filters(&env::var("RUST_LOG").unwrap());
        }
        if builder.try_init().is_err() {
            panic!("Failed to set log level - has it been specified multiple times?")
        }
    }
    if is_last {
        info!("lyrebird version {}", crate_version!());
    }
}
