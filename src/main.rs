//! Main binary entry point for the xmljson-converter.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use xmljson_converter::errors::ConverterError;
use xmljson_converter::{Config, ConversionDirection};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Output file (defaults to the input name with the target extension)"
    )]
    output: Option<PathBuf>,

    #[arg(
        short,
        long,
        value_enum,
        help = "Conversion direction (detected from the input file when omitted)"
    )]
    direction: Option<ConversionDirection>,

    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "JSON policy file with conversion options for the chosen direction"
    )]
    config: Option<PathBuf>,

    #[arg(short, long, help = "Indent the output")]
    pretty: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn setup_logging(verbose: bool) {
    let filter_level = if verbose {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Warn
    };

    env_logger::Builder::new()
        .filter(None, filter_level)
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn run_app() -> Result<(), ConverterError> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let config = Config {
        input_file: cli.input,
        output_file: cli.output,
        direction: cli.direction,
        policy_file: cli.config,
        pretty: cli.pretty,
    };

    xmljson_converter::run(config)
}

fn main() -> ExitCode {
    match run_app() {
        Ok(_) => {
            log::info!("Conversion completed successfully.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("A fatal error occurred:");
            log::error!("{}", e);
            let mut source = std::error::Error::source(&e);
            while let Some(s) = source {
                log::error!("  Caused by: {}", s);
                source = std::error::Error::source(s);
            }
            ExitCode::FAILURE
        }
    }
}
