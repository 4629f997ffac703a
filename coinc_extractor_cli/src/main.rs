//! # coinc_extractor_cli
//!
//! Command line front end for the coincidence extraction library.
//!
//! ## Use
//!
//! Make a template configuration file, fill it out, and run the extraction:
//!
//! ```bash
//! coinc_extractor_cli new -p config.yml
//! coinc_extractor_cli -p config.yml
//! ```
//!
//! Progress is shown on the terminal; the detailed status of the run is
//! written to `coinc_extractor.log` next to where the program was invoked.
use clap::{Arg, Command};
use indicatif::ProgressBar;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::Arc;

use libcoinc_extractor::config::Config;
use libcoinc_extractor::process::process;
use libcoinc_extractor::worker_status::WorkerStatus;

fn make_template_config(path: &Path) {
    let config = Config::default();
    let yaml_str = serde_yaml::to_string(&config).unwrap();
    let mut file = File::create(path).expect("Could create template config file!");
    file.write_all(yaml_str.as_bytes())
        .expect("Failed to write yaml data to file!");
}

fn main() {
    // Create a cli
    let matches = Command::new("coinc_extractor_cli")
        .arg_required_else_help(true)
        .subcommand(Command::new("new").about("Make a template configuration yaml file"))
        .arg(
            Arg::new("path")
                .short('p')
                .long("path")
                .global(true)
                .help("Path to the configuration file"),
        )
        .get_matches();

    // Log to the terminal and to a file next to the invocation
    let file_sink = Arc::new(
        spdlog::sink::FileSink::builder()
            .path(PathBuf::from("./coinc_extractor.log"))
            .truncate(true)
            .build()
            .expect("Could not create the log file sink!"),
    );
    let logger = spdlog::default_logger()
        .fork_with(|new| {
            new.sinks_mut().push(file_sink);
            Ok(())
        })
        .expect("Could not create logging!");
    spdlog::set_default_logger(logger);

    // Parse the cli
    let config_path = PathBuf::from(matches.get_one::<String>("path").expect("We require args"));

    match matches.subcommand() {
        Some(("new", _)) => {
            spdlog::info!(
                "Making a template config at {}...",
                config_path.to_string_lossy()
            );

            make_template_config(&config_path);
            spdlog::info!("Done.");
            return;
        }
        _ => (),
    }

    // Load our config
    spdlog::info!("Loading config from {}...", config_path.to_string_lossy());
    let config = match Config::read_config_file(&config_path) {
        Ok(c) => c,
        Err(e) => {
            spdlog::error!("{e}");
            return;
        }
    };
    spdlog::info!("Config successfully loaded.");
    spdlog::info!("Event file: {}", config.event_file_path.to_string_lossy());
    spdlog::info!("Output Path: {}", config.output_path.to_string_lossy());
    spdlog::info!(
        "Calibration Path: {}",
        config.calibration_path.to_string_lossy()
    );
    spdlog::info!("Channels a: {:?}", config.channels_a);
    spdlog::info!("Channels b: {:?}", config.channels_b);
    spdlog::info!(
        "Time window: [{}, {}] ns",
        config.time_min,
        config.time_max
    );
    spdlog::info!(
        "Energy window: [{}, {}] ch",
        config.energy_min,
        config.energy_max
    );
    spdlog::info!("PSD window: [{}, {}]", config.psd_min, config.psd_max);

    // Setup the progress bar and the status channel
    let pb = ProgressBar::new(100);
    let (tx, rx) = mpsc::channel::<WorkerStatus>();

    // Spawn the task!
    let worker_config = config.clone();
    let handle = std::thread::spawn(move || process(&worker_config, &tx));

    // The channel closes when the worker is done with its sender
    for status in rx.iter() {
        pb.set_position((status.progress * 100.0) as u64);
    }
    pb.finish();

    match handle.join() {
        Ok(result) => match result {
            Ok(_) => spdlog::info!("Successfully extracted coincidences!"),
            Err(e) => spdlog::error!("Extraction failed with error: {e}"),
        },
        Err(_) => spdlog::error!("Failed to join the extraction task!"),
    }

    spdlog::info!("Done.");
}
