mod report;

use ptslab::{design_strands, DesignConfig};
use report::{render_design, render_failure};
use std::error::Error;
use std::path::PathBuf;
use structopt::StructOpt;

/// Command line options
#[derive(StructOpt, Debug)]
#[structopt(
    name = "ptslab",
    about = "Minimises the strand count of a post-tensioned slab"
)]
struct Options {
    /// JSON configuration; the reference 8 x 12 m slab is used when omitted
    #[structopt(short, long, parse(from_os_str))]
    config: Option<PathBuf>,

    /// Override the strand cap of every tendon
    #[structopt(short = "n", long)]
    max_strands: Option<u32>,

    /// Print the effective configuration as JSON and exit
    #[structopt(long)]
    print_config: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let options = Options::from_args();

    // Start from the reference slab unless a JSON file describes another one.
    // Sections missing from the file keep their defaults.
    let mut config = match &options.config {
        Some(path) => DesignConfig::from_json_file(path)?,
        None => DesignConfig::default(),
    };

    // The strand cap bounds every tendon in the linear program and sets the
    // fully stressed layout used by the precheck.
    if let Some(max_strands) = options.max_strands {
        config = config.with_max_strands(max_strands);
    }

    if options.print_config {
        println!("{}", config.to_json_string()?);
        return Ok(());
    }

    // Build the control grid and influence matrix, check that the fully stressed
    // layout meets the target, then minimise the strand count as a linear program.
    // See: https://en.wikipedia.org/wiki/Prestressed_concrete#Post-tensioned_concrete
    // and https://en.wikipedia.org/wiki/Simplex_algorithm
    match design_strands(&config) {
        Ok(design) => {
            // Gate messages, the tendon table and the steel takeoff.
            println!("{}", render_design(&config, &design));
            Ok(())
        }
        Err(error) => {
            // A fatal error is reported with a hint, then returned so the exit code
            // is non-zero.
            eprintln!("{}", render_failure(&error));
            Err(error.into())
        }
    }
}
