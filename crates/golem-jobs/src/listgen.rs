//! RF-ACE run list generation.
//!
//! One command line per feature index in `[start, end)`, each a golem
//! run-list entry (`1 <cmd>`) that trains rf_ace against the feature matrix
//! and writes `associations_<i>.out` into the associations directory.

use crate::config::RfAceConfig;
use crate::error::GenError;
use crate::submit::{submit_commands, CommandRunner};
use anyhow::Context;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const README_NAME: &str = "README";

#[derive(Debug, Clone)]
pub struct ListGenOptions {
    pub start: i64,
    pub end: i64,
    pub matrix_file: PathBuf,
    pub associations_dir: PathBuf,
    pub commands_file: PathBuf,
    /// Skip the directory and matrix checks and the README.
    pub local: bool,
    pub submit: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListGenResult {
    pub commands_file: PathBuf,
    pub command_count: usize,
    pub created_dir: bool,
    pub readme: Option<PathBuf>,
    pub submitted: bool,
    /// Submission command as shown to the user, password masked.
    pub submission_line: Option<String>,
}

pub fn associations_prefix(dir: &Path) -> String {
    let mut prefix = dir.to_string_lossy().to_string();
    if !prefix.ends_with('/') {
        prefix.push('/');
    }
    prefix
}

pub fn command_line(config: &RfAceConfig, matrix_file: &Path, prefix: &str, index: i64) -> String {
    format!(
        "1 {} -I {} -i {} -n {} -m {} --nodesize {} -p {} -t {} -O {}associations_{}.out",
        config.execpath,
        matrix_file.display(),
        index,
        config.numtrees,
        config.mtry,
        config.nodesize,
        config.permutations,
        config.pvalue_t,
        prefix,
        index
    )
}

pub fn build_command_lines(
    config: &RfAceConfig,
    matrix_file: &Path,
    associations_dir: &Path,
    start: i64,
    end: i64,
) -> Vec<String> {
    let prefix = associations_prefix(associations_dir);
    (start..end)
        .map(|i| command_line(config, matrix_file, &prefix, i))
        .collect()
}

/// Makes sure the associations directory exists, creating it world-writable
/// when absent. Returns whether it had to be created.
pub fn ensure_associations_dir(dir: &Path) -> Result<bool, GenError> {
    if dir.exists() {
        return Ok(false);
    }
    let create = |source: std::io::Error| GenError::CreateDir {
        path: dir.to_path_buf(),
        source,
    };
    fs::create_dir_all(dir).map_err(create)?;
    make_world_writable(dir);
    info!(dir = %dir.display(), "created associations directory");
    Ok(true)
}

/// Best-effort `chmod 777`; a failure only warns.
fn make_world_writable(dir: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Err(e) = fs::set_permissions(dir, fs::Permissions::from_mode(0o777)) {
            warn!(dir = %dir.display(), error = %e, "could not make associations directory world-writable");
            return false;
        }
    }
    true
}

pub fn readme_text(config: &RfAceConfig, matrix_file: &Path, submitted_at: DateTime<Local>) -> String {
    format!(
        "Submission to GOLEM using RF-ACE Scheduler\n\
         Feature Matrix {}\n\
         Date Submitted {}\n\
         RF_ACE version {}\n\
         mtry {} numtrees {} permutations {} pvalue {} nodesize {}\n\
         Contact {}\n",
        matrix_file.display(),
        submitted_at.format("%a %b %e %H:%M:%S %Y"),
        config.execpath,
        config.mtry,
        config.numtrees,
        config.permutations,
        config.pvalue_t,
        config.nodesize,
        config.contact
    )
}

pub fn write_readme(
    config: &RfAceConfig,
    matrix_file: &Path,
    associations_dir: &Path,
    submitted_at: DateTime<Local>,
) -> anyhow::Result<PathBuf> {
    let path = associations_dir.join(README_NAME);
    fs::write(&path, readme_text(config, matrix_file, submitted_at))
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

pub fn write_command_file(path: &Path, lines: &[String]) -> anyhow::Result<()> {
    let file = fs::File::create(path)
        .with_context(|| format!("failed to open commands file {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for line in lines {
        writeln!(writer, "{}", line)?;
    }
    writer.flush()?;
    Ok(())
}

/// Runs the whole generation pipeline. Any failure aborts immediately and
/// leaves whatever was already written in place.
pub fn generate(
    opts: &ListGenOptions,
    config: &RfAceConfig,
    runner: &dyn CommandRunner,
) -> Result<ListGenResult, GenError> {
    let mut created_dir = false;
    let mut readme = None;
    if !opts.local {
        created_dir = ensure_associations_dir(&opts.associations_dir)?;
        if !opts.matrix_file.exists() {
            return Err(GenError::MatrixMissing(opts.matrix_file.clone()));
        }
        let path = write_readme(
            config,
            &opts.matrix_file,
            &opts.associations_dir,
            Local::now(),
        )?;
        debug!(path = %path.display(), "wrote submission readme");
        readme = Some(path);
    }

    let lines = build_command_lines(
        config,
        &opts.matrix_file,
        &opts.associations_dir,
        opts.start,
        opts.end,
    );
    write_command_file(&opts.commands_file, &lines)?;
    info!(
        file = %opts.commands_file.display(),
        count = lines.len(),
        start = opts.start,
        end = opts.end,
        "wrote run list"
    );

    let submission_line = if opts.submit {
        Some(submit_commands(runner, config, &opts.commands_file)?.display_line)
    } else {
        None
    };

    Ok(ListGenResult {
        commands_file: opts.commands_file.clone(),
        command_count: lines.len(),
        created_dir,
        readme,
        submitted: opts.submit,
        submission_line,
    })
}
