//! ADL Prognosis: command-line front end.
//!
//! Loads the saved input snapshot (or the defaults), evaluates it and prints
//! the text report.

use anyhow::{Context, Result};
use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use adl_prognosis::adapters::chacha::ChaChaNoise;
use adl_prognosis::adapters::json_store::JsonFileStore;
use adl_prognosis::adapters::redact::RedactingMakeWriter;
use adl_prognosis::application::DEFAULT_TRIALS;
use adl_prognosis::ports::SnapshotStore;
use adl_prognosis::{report, run_checks, Assessment, ModelConfig, PrognosisError, PrognosisService};

const USAGE: &str = "\
Usage: adl-prognosis [OPTIONS]

Options:
  --state <PATH>    Snapshot file (default: ./adl_state_v1.json)
  --config <PATH>   Model configuration JSON (default: built-in + env overrides)
  --seed <N>        Seed the bootstrap interval for reproducible output
  --trials <N>      Bootstrap trials (default: 200, 0 disables)
  --show-age        Include the explanatory age scenarios
  --save            Write the (clamped) input back to the snapshot file
  --reset           Delete the snapshot file and exit
  --check           Run the consistency checks instead of the report
  --json            Print the prognosis as JSON
  -h, --help        Show this help";

#[derive(Debug, Default)]
struct Args {
    state: Option<PathBuf>,
    config: Option<PathBuf>,
    seed: Option<u64>,
    trials: Option<usize>,
    show_age: bool,
    save: bool,
    reset: bool,
    check: bool,
    json: bool,
    help: bool,
}

fn parse_args<I: Iterator<Item = String>>(mut it: I) -> adl_prognosis::Result<Args> {
    let mut args = Args::default();

    fn value<I: Iterator<Item = String>>(it: &mut I, flag: &str) -> adl_prognosis::Result<String> {
        it.next()
            .ok_or_else(|| PrognosisError::InvalidArgument(format!("{flag} requires a value")))
    }

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--state" => args.state = Some(PathBuf::from(value(&mut it, "--state")?)),
            "--config" => args.config = Some(PathBuf::from(value(&mut it, "--config")?)),
            "--seed" => {
                let v = value(&mut it, "--seed")?;
                args.seed = Some(v.parse().map_err(|_| {
                    PrognosisError::InvalidArgument(format!("invalid seed: {v}"))
                })?);
            }
            "--trials" => {
                let v = value(&mut it, "--trials")?;
                args.trials = Some(v.parse().map_err(|_| {
                    PrognosisError::InvalidArgument(format!("invalid trial count: {v}"))
                })?);
            }
            "--show-age" => args.show_age = true,
            "--save" => args.save = true,
            "--reset" => args.reset = true,
            "--check" => args.check = true,
            "--json" => args.json = true,
            "-h" | "--help" => args.help = true,
            other => {
                return Err(PrognosisError::InvalidArgument(format!(
                    "unknown argument: {other}"
                )))
            }
        }
    }

    Ok(args)
}

fn main() -> Result<()> {
    let args = parse_args(std::env::args().skip(1))?;
    if args.help {
        println!("{USAGE}");
        return Ok(());
    }

    // Initialize logging.
    //
    // The report goes to stdout. Default behavior:
    // - interactive TTY: log to a file
    // - non-interactive: log to stderr, keeping stdout clean for piping
    let log_mode = std::env::var("ADL_PROGNOSIS_LOG_MODE").unwrap_or_else(|_| "auto".to_string());

    let interactive = std::io::stdout().is_terminal();
    let use_file = match log_mode.as_str() {
        "file" => true,
        "stdout" | "stderr" => false,
        // auto
        _ => interactive,
    };

    let (writer, _guard) = if use_file {
        let log_file = std::env::var("ADL_PROGNOSIS_LOG_FILE")
            .unwrap_or_else(|_| "adl-prognosis.log".to_string());

        if let Some(parent) = std::path::Path::new(&log_file).parent() {
            // Best-effort: don't fail startup just because the directory is missing.
            let _ = std::fs::create_dir_all(parent);
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .with_context(|| format!("opening log file {log_file}"))?;
        tracing_appender::non_blocking(file)
    } else if log_mode == "stdout" {
        tracing_appender::non_blocking(std::io::stdout())
    } else {
        tracing_appender::non_blocking(std::io::stderr())
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(RedactingMakeWriter::new(writer)))
        .init();

    tracing::info!("Starting adl-prognosis...");

    run(&args, &mut std::io::stdout())?;

    tracing::info!("adl-prognosis done.");
    Ok(())
}

/// Load the saved snapshot, falling back to the defaults for `config`.
///
/// An unreadable or corrupt snapshot is reported and ignored; it is
/// overwritten by the next `--save`.
fn load_or_default<S: SnapshotStore>(store: &S, config: &ModelConfig) -> Assessment {
    match store.load() {
        Ok(Some(a)) => {
            tracing::info!("Loaded input snapshot");
            a
        }
        Ok(None) => {
            tracing::info!("No snapshot found; using default inputs");
            Assessment::for_config(config)
        }
        Err(e) => {
            tracing::warn!("Ignoring unreadable snapshot: {e}");
            eprintln!("note: ignoring unreadable snapshot ({e}); using default inputs");
            Assessment::for_config(config)
        }
    }
}

fn run<W: Write>(args: &Args, out: &mut W) -> adl_prognosis::Result<()> {
    let store = match &args.state {
        Some(path) => JsonFileStore::new(path),
        None => JsonFileStore::in_dir("."),
    };

    if args.reset {
        store.clear()?;
        writeln!(out, "Cleared {}", store.path().display())?;
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => ModelConfig::from_json_file(path)?,
        None => ModelConfig::from_env_or_default(),
    };

    let mut assessment = load_or_default(&store, &config);

    for msg in assessment.clamp_inputs() {
        tracing::warn!("Clamped input {msg}");
        eprintln!("note: {msg}");
    }

    let mut noise = ChaChaNoise::from_optional_seed(args.seed);

    if args.check {
        let results = run_checks(&assessment, &config, &mut noise);
        write!(out, "{}", report::render_checks(&results))?;
        return Ok(());
    }

    let mut service = PrognosisService::new(config, noise)
        .with_trials(args.trials.unwrap_or(DEFAULT_TRIALS))
        .with_age_scenarios(args.show_age);
    let prognosis = service.evaluate(&assessment);

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &prognosis)?;
        writeln!(out)?;
    } else {
        write!(out, "{}", report::render(&assessment, &prognosis))?;
    }

    if args.save {
        store.save(&assessment)?;
        writeln!(out, "Saved input to {}", store.path().display())?;
    }

    Ok(())
}
