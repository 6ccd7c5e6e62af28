use std::{env, fs};

use anyhow::{Context, Result};
use env_logger::Env;
use log::info;
use scratchnet::{specs::TrainerSpec, training::TrainerBuilder};

fn main() -> Result<()> {
    // Progress lines are logged at info, shown unless RUST_LOG asks otherwise.
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let path = env::args()
        .nth(1)
        .context("usage: scratchnet <trainer spec json> (log level via RUST_LOG, default info)")?;

    let text = fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    let spec: TrainerSpec = serde_json::from_str(&text).with_context(|| format!("parsing {path}"))?;

    let (mut trainer, dataset) = TrainerBuilder::new().build(&spec)?;
    info!("training on {} samples for {} epochs", dataset.len(), spec.epochs);

    trainer.train(dataset.x(), dataset.y(), spec.epochs.get())?;
    let (loss, metrics) = trainer.eval(dataset.x(), dataset.y(), None)?;

    for (metric, value) in trainer.metrics().iter().zip(&metrics) {
        info!("{}: {value:.4}", metric.name());
    }

    let history = trainer.history();
    info!("{} (eval loss {loss:.4})", history.title());
    println!("{}", history.to_json()?);

    Ok(())
}
