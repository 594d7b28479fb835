use clap::Parser;
use repo_locate::config::{CliArgs, Config, ConfigFile, DEFAULT_CONFIG_FILE};
use repo_locate::output;
use std::path::PathBuf;

fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn main() {
    let args = CliArgs::parse();

    init_logging(args.verbose);

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let config_file = if config_path.exists() {
        match ConfigFile::load(&config_path) {
            Ok(cf) => Some(cf),
            Err(e) => {
                log::warn!("{e}");
                None
            }
        }
    } else {
        None
    };

    let config = Config::from_args_and_file(args, config_file);
    if config.no_color {
        colored::control::set_override(false);
    }
    log::info!("resolving {}", config.url);

    let location = match config.request().resolve(&config.navigation) {
        Ok(location) => location,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(2);
        }
    };

    if !config.quiet {
        println!("{}", output::format_location(config.format, &location));
    }
}
