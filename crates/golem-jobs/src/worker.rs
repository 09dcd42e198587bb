use anyhow::{anyhow, Context, Result};
use rand::Rng;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Lines written by one sample job.
pub const SAMPLE_COUNT: usize = 1000;
/// Inclusive upper bound of every sampled integer.
pub const SAMPLE_MAX: u32 = 1000;

const OUTPUT_SUFFIX: &str = ".output.txt";

/// Identifiers golem hands to every job it launches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationIds {
    pub submission_id: String,
    pub line_id: String,
    pub job_id: String,
}

impl InvocationIds {
    pub fn new(
        submission_id: impl Into<String>,
        line_id: impl Into<String>,
        job_id: impl Into<String>,
    ) -> Self {
        Self {
            submission_id: submission_id.into(),
            line_id: line_id.into(),
            job_id: job_id.into(),
        }
    }

    pub fn stem(&self) -> String {
        filename_stem(&[
            self.submission_id.as_str(),
            self.line_id.as_str(),
            self.job_id.as_str(),
        ])
    }

    pub fn output_file_name(&self) -> String {
        format!("{}{}", self.stem(), OUTPUT_SUFFIX)
    }
}

pub fn filename_stem<S: AsRef<str>>(ids: &[S]) -> String {
    ids.iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(".")
}

/// Resolves where the job writes. An absolute identifier stem wins over
/// `out_dir`, the same way `Path::join` treats absolute components.
pub fn output_path(ids: &InvocationIds, out_dir: Option<&Path>) -> PathBuf {
    let name = ids.output_file_name();
    match out_dir {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}

pub fn write_samples<R: Rng>(
    path: &Path,
    count: usize,
    max: u32,
    rng: &mut R,
) -> Result<()> {
    let file = fs::File::create(path)
        .with_context(|| format!("failed to open sample output {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for _ in 0..count {
        writeln!(writer, "{}", rng.gen_range(0..=max))?;
    }
    writer
        .flush()
        .map_err(|e| anyhow!("failed to flush {}: {}", path.display(), e))?;
    debug!(path = %path.display(), count, "samples flushed");
    Ok(())
}

pub fn run_sample_job(ids: &InvocationIds, out_dir: Option<&Path>) -> Result<PathBuf> {
    let path = output_path(ids, out_dir);
    info!(stem = %ids.stem(), path = %path.display(), "running sample job");
    let mut rng = rand::thread_rng();
    write_samples(&path, SAMPLE_COUNT, SAMPLE_MAX, &mut rng)?;
    Ok(path)
}
