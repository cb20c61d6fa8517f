use std::process::ExitCode;

use clap::Parser;
use mame_dl::cli::{self, Args};

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let result = cli::run(&args).await;
    if let Err(e) = &result {
        eprintln!("Error: {e}");
    }
    ExitCode::from(cli::exit_status(&result))
}
