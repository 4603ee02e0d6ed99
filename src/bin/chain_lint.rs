use std::path::PathBuf;

use anyhow::{Context, Result};
use chainmodels::{
    config::Config,
    domain::Chain,
    infrastructure::logging::init_logging,
    validation::{bind_json, missing_fields_err, register_configured_rules, RuleEngine},
};

const USAGE: &str = "usage: chain_lint [--config FILE] [--actual-names] CHAIN.json...";

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    actual_names: bool,
    files: Vec<PathBuf>,
}

fn parse_args() -> Result<Args> {
    let mut parsed = Args::default();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().context("--config requires a file")?;
                parsed.config = Some(PathBuf::from(path));
            }
            "--actual-names" => parsed.actual_names = true,
            "-h" | "--help" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            other if other.starts_with("--") => anyhow::bail!("unknown flag {other}\n{USAGE}"),
            _ => parsed.files.push(PathBuf::from(arg)),
        }
    }

    if parsed.files.is_empty() {
        anyhow::bail!("{USAGE}");
    }
    Ok(parsed)
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = parse_args()?;

    let config = Config::from_env_and_file(args.config.as_ref())?;
    config.validate().context("invalid configuration")?;
    init_logging(&config.logging).map_err(|e| anyhow::anyhow!("init logging: {e}"))?;

    let mut engine = RuleEngine::new();
    register_configured_rules(&mut engine, &config.validation)
        .context("register validation rules")?;
    tracing::debug!(?engine, "validation rules registered");

    let mut failures = 0usize;
    for file in &args.files {
        let body = std::fs::read(file).with_context(|| format!("read {}", file.display()))?;

        match bind_json::<Chain>(&body, &engine) {
            Ok(chain) => println!("ok {} ({})", file.display(), chain.chain_name),
            Err(e) => {
                failures += 1;
                let e = missing_fields_err(e, args.actual_names);
                tracing::warn!(file = %file.display(), code = e.code(), "chain rejected");
                println!("FAIL {}: {}", file.display(), e);
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} files failed", failures, args.files.len());
    }

    Ok(())
}
