//! Command line interface for "db index-scores".

use clap::Parser;

use crate::common::{noodles::build_tbi, trace_rss_now};

/// Command line arguments for `db index-scores` sub command.
#[derive(Parser, Debug)]
#[command(about = "Build tabix index for a score TSV file", long_about = None)]
pub struct Args {
    /// Path to the bgzf-compressed and coordinate-sorted score file.
    #[arg(long)]
    pub path_input: String,
    /// Path to the output index, `<path_input>.tbi` if not given.
    #[arg(long)]
    pub path_output: Option<String>,
}

impl Args {
    fn path_output(&self) -> String {
        self.path_output
            .clone()
            .unwrap_or_else(|| format!("{}.tbi", &self.path_input))
    }
}

/// Main entry point for the `db index-scores` command.
pub fn run(common_args: &crate::common::Args, args: &Args) -> Result<(), anyhow::Error> {
    tracing::info!("Starting `db index-scores`");
    tracing::info!("  common_args = {:?}", &common_args);
    tracing::info!("  args = {:?}", &args);

    let before_indexing = std::time::Instant::now();
    let path_output = args.path_output();
    build_tbi(&args.path_input, &path_output)
        .map_err(|e| anyhow::anyhow!("could not index {}: {}", &args.path_input, e))?;
    tracing::info!(
        "... wrote {} in {:?}",
        &path_output,
        before_indexing.elapsed()
    );

    trace_rss_now();

    tracing::info!("All of `db index-scores` completed");
    Ok(())
}
