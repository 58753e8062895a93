use clap::Parser;
use tickstats::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
