use anyhow::Result;
use clap::Parser;
use golem_jobs::{run_sample_job, InvocationIds};
use std::path::PathBuf;

/// Sample golem job: writes 1000 random integers to
/// `<submission_id>.<line_id>.<job_id>.output.txt`.
///
/// Six copies through a golem master on localhost:8083:
/// `golem.py localhost:8083 run 6 golem-sample-worker`
#[derive(Parser, Debug)]
#[command(name = "golem-sample-worker", version)]
struct Cli {
    submission_id: String,
    line_id: String,
    job_id: String,
    /// Directory for the output file; defaults to wherever the node was started.
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    golem_cli::init_tracing();
    let cli = Cli::parse();
    let ids = InvocationIds::new(cli.submission_id, cli.line_id, cli.job_id);
    let path = run_sample_job(&ids, cli.out_dir.as_deref())?;
    println!("wrote: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requires_all_three_ids() {
        assert!(Cli::try_parse_from(["golem-sample-worker", "1", "2"]).is_err());
        assert!(Cli::try_parse_from(["golem-sample-worker", "1", "2", "3", "4"]).is_err());
        let cli = Cli::try_parse_from(["golem-sample-worker", "1", "2", "3"]).expect("parse");
        assert_eq!(cli.submission_id, "1");
        assert_eq!(cli.job_id, "3");
        assert!(cli.out_dir.is_none());
    }

    #[test]
    fn out_dir_flag_is_optional() {
        let cli = Cli::try_parse_from(["golem-sample-worker", "--out-dir", "/tmp/x", "a", "b", "c"])
            .expect("parse");
        assert_eq!(cli.out_dir, Some(PathBuf::from("/tmp/x")));
    }
}
