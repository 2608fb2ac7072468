use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use cstar_source::Config;
use log::LevelFilter;

/// The args struct
#[derive(Debug, clap::Parser)]
#[clap(author, version, about = "Checks cstar programs for lexical, syntax and semantic errors")]
struct Args {
    /// Source file to check
    #[clap(value_name = "source file", value_hint = clap::ValueHint::FilePath)]
    file: PathBuf,
    /// Treat semantic errors as fatal
    #[clap(long)]
    strict: bool,
    /// Narrate parser and analyzer decisions (shown with -vvv)
    #[clap(long)]
    trace: bool,
    /// Require declaration initializers to match the declared type
    #[clap(long)]
    check_initializers: bool,
    /// Print the parsed program back as source text
    #[clap(long)]
    emit: bool,
    #[clap(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn log_level_filter(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    fn config(&self) -> Config {
        Config::default()
            .with_trace(self.trace)
            .with_check_initializers(self.check_initializers)
    }
}

fn main() -> eyre::Result<ExitCode> {
    color_eyre::install()?;
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.log_level_filter())
        .parse_default_env()
        .init();
    log::debug!("starting cstar with args: {args:?}");

    let compilation = cstar::compile_file(&args.file, args.config())?;
    for diagnostic in &compilation.diagnostics {
        eprintln!("{}", diagnostic);
    }
    if args.emit {
        print!("{}", compilation.program);
    }

    match compilation.verdict(args.strict) {
        Ok(()) => {
            log::info!(
                "{}: {} statements checked",
                args.file.display(),
                compilation.program.len()
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("{}", err);
            Ok(ExitCode::FAILURE)
        }
    }
}
