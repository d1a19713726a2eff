use std::process;

#[macro_use]
extern crate clap;
use clap::{Arg, App};

#[macro_use]
extern crate log;

use realbox::config::Config;
use realbox::machine::{Machine, Status};

fn main() {
    let matches = App::new("realbox")
        .version(crate_version!())
        .about("Runs a DOS .com program on an emulated 8086")
        .arg(Arg::with_name("INPUT")
            .help("Sets the .com program to run")
            .required(true)
            .index(1))
        .arg(Arg::with_name("CONFIG")
            .help("Reads settings from a TOML file")
            .takes_value(true)
            .long("config"))
        .arg(Arg::with_name("TRACE")
            .help("Logs every executed instruction (debugging)")
            .long("trace"))
        .arg(Arg::with_name("LIMIT")
            .help("Stops after executing this many instructions")
            .takes_value(true)
            .long("limit"))
        .get_matches();

    let mut config = match matches.value_of("CONFIG") {
        Some(path) => Config::from_file(path).unwrap_or_else(|e| fail(&e)),
        None => Config::default(),
    };
    if matches.is_present("TRACE") {
        config.trace = true;
    }
    if matches.is_present("LIMIT") {
        config.instruction_limit = Some(value_t!(matches, "LIMIT", usize).unwrap_or_else(|e| e.exit()));
    }

    let mut logger = env_logger::Builder::from_default_env();
    if config.trace {
        logger.filter_module("realbox", log::LevelFilter::Trace);
    }
    logger.init();

    // INPUT is required, clap exits before we get here without it
    let filename = matches.value_of("INPUT").unwrap_or_default();

    let mut machine = Machine::new(config);
    if let Err(e) = machine.load_com_file(filename) {
        fail(&e);
    }

    let code = match machine.run() {
        Status::Running => {
            warn!("instruction limit reached, program is still running");
            0
        }
        Status::Exited(code) => i32::from(code),
        Status::Stopped(reason) => {
            info!("execution stopped: {:?}", reason);
            0
        }
    };
    process::exit(code);
}

fn fail(e: &dyn std::fmt::Display) -> ! {
    eprintln!("error: {}", e);
    process::exit(1);
}
