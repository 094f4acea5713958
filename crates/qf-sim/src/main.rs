use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    network::{self, NetworkArgs},
    run::{self, RunArgs},
    selfcheck::{self, SelfcheckArgs},
    version::{self, VersionArgs},
};

mod commands;
mod export;
mod logging;

#[derive(Parser, Debug)]
#[command(name = "qf-sim", about = "Periodic lattice field and actor network simulator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Integrate a lattice field configuration and export its trajectory.
    Run(RunArgs),
    /// Integrate an actor network and export its power series.
    Network(NetworkArgs),
    /// Compare the periodic Laplacian against the analytic second derivative.
    Selfcheck(SelfcheckArgs),
    /// Print version information.
    Version(VersionArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    logging::init()?;
    match cli.command {
        Command::Run(args) => run::run(&args),
        Command::Network(args) => network::run(&args),
        Command::Selfcheck(args) => selfcheck::run(&args),
        Command::Version(args) => version::run(&args),
    }
}
