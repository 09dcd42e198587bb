use anyhow::{anyhow, Result};
use clap::Parser;
use golem_jobs::{generate, GenError, ListGenOptions, ListGenResult, RfAceConfig, ShellRunner};
use serde_json::{json, Value};
use std::path::PathBuf;

const USAGE: &str = "Try rf-ace-list-gen --help\nRequires:start[0..n-1] featureEnd, inputMatrixFile, associationsDir, commandsOutfile";

#[derive(Parser, Debug)]
#[command(
    name = "rf-ace-list-gen",
    version = "1.0",
    about = "Check rf_ace.config for appropriate tunings and rf-ace version",
    override_usage = "rf-ace-list-gen [OPTIONS] start[0..n-1] featureEnd inputMatrixFile associationsDir commandsOutfile"
)]
struct Cli {
    /// start end inputMatrixFile associationsDir commandsOutfile
    #[arg(allow_negative_numbers = true)]
    args: Vec<String>,
    /// Local mode: do not check that the matrix file and output directory exist,
    /// and do not write the README. Confirm both paths are valid before
    /// submitting jobs to the grid.
    #[arg(short = 'l', long = "local")]
    local: bool,
    /// Submit the generated job list to golem. When running with --local,
    /// validate the input matrix and output directory yourself first.
    #[arg(short = 's', long = "submit")]
    submit: bool,
    #[arg(long, default_value = golem_jobs::DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    golem_cli::init_tracing();
    let cli = Cli::parse();
    if cli.args.len() != 5 {
        println!("{}", USAGE);
        std::process::exit(1);
    }
    let json_mode = cli.json;
    match run(cli) {
        Ok(Some(payload)) => {
            emit_json(&payload);
            Ok(())
        }
        Ok(None) => Ok(()),
        Err(err) => {
            if json_mode {
                emit_json(&json_error(err.code(), err.to_string()));
                std::process::exit(err.exit_status());
            }
            match err {
                GenError::Other(inner) => Err(inner),
                fatal => {
                    println!("{}", fatal);
                    std::process::exit(fatal.exit_status());
                }
            }
        }
    }
}

fn run(cli: Cli) -> Result<Option<Value>, GenError> {
    let config = RfAceConfig::load(&cli.config)?;
    let opts = options_from_args(&cli.args, cli.local, cli.submit)?;
    tracing::debug!(?opts, "generating run list");
    let result = generate(&opts, &config, &ShellRunner::default())?;
    if cli.json {
        return Ok(Some(json!({
            "ok": true,
            "command": "rf-ace-list-gen",
            "run": result_to_json(&result),
            "config": serde_json::to_value(&config).map_err(anyhow::Error::from)?,
            "local": opts.local,
        })));
    }
    if let Some(line) = &result.submission_line {
        println!("submitting to golem: {}", line);
    }
    println!("commands: {}", result.commands_file.display());
    println!("command_count: {}", result.command_count);
    if let Some(readme) = &result.readme {
        println!("readme: {}", readme.display());
    }
    Ok(None)
}

fn options_from_args(args: &[String], local: bool, submit: bool) -> Result<ListGenOptions> {
    if args.len() != 5 {
        return Err(anyhow!("expected 5 positional arguments, got {}", args.len()));
    }
    Ok(ListGenOptions {
        start: parse_index("start", &args[0])?,
        end: parse_index("end", &args[1])?,
        matrix_file: PathBuf::from(&args[2]),
        associations_dir: PathBuf::from(&args[3]),
        commands_file: PathBuf::from(&args[4]),
        local,
        submit,
    })
}

fn parse_index(name: &str, raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| anyhow!("invalid {} '{}': expected an integer", name, raw))
}

fn result_to_json(result: &ListGenResult) -> Value {
    json!({
        "commands_file": result.commands_file.display().to_string(),
        "command_count": result.command_count,
        "created_dir": result.created_dir,
        "readme": result.readme.as_ref().map(|p| p.display().to_string()),
        "submitted": result.submitted,
        "submission_line": result.submission_line,
    })
}

fn emit_json(value: &Value) {
    match serde_json::to_string(value) {
        Ok(s) => println!("{}", s),
        Err(_) => println!(
            "{{\"ok\":false,\"error\":{{\"code\":\"serialization_error\",\"message\":\"failed to serialize JSON payload\"}}}}"
        ),
    }
}

fn json_error(code: &str, message: String) -> Value {
    json!({
        "ok": false,
        "error": {
            "code": code,
            "message": message
        }
    })
}
