use clap::Parser;
use dcatrader::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
