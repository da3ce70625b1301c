use std::path::PathBuf;

use anyhow::Context as _;
use desk_scene::{SceneConfig, flow};

struct Args {
    config: Option<PathBuf>,
    dry_run: bool,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = Args {
        config: None,
        dry_run: false,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter.next().context("--config needs a path")?;
                args.config = Some(PathBuf::from(path));
            }
            "--dry-run" => args.dry_run = true,
            "-h" | "--help" => {
                println!("usage: desk-scene [--config <file.json>] [--dry-run]");
                std::process::exit(0);
            }
            other => anyhow::bail!("unknown argument `{other}`"),
        }
    }
    Ok(args)
}

fn main() -> anyhow::Result<()> {
    let args = parse_args()?;
    let config = match &args.config {
        Some(path) => SceneConfig::from_path(path)
            .with_context(|| format!("could not load config {}", path.display()))?,
        None => SceneConfig::default(),
    };

    if args.dry_run {
        let report = flow::run_headless(config)?;
        println!("{} draws, {} issues", report.draws, report.issues.len());
        for issue in &report.issues {
            println!("  {issue}");
        }
        return Ok(());
    }

    flow::run(config)
}
