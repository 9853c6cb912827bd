use anyhow::Result;
use env_logger::Env;
use std::env;

use wealthgap::config::PipelineConfig;
use wealthgap::pipeline;

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();

    if args.len() > 3 {
        eprintln!("Usage: cargo run -- [base_dir] [rounding_precision]");
        std::process::exit(1);
    }

    let mut config = PipelineConfig::new(args.get(1).map(String::as_str).unwrap_or("."));
    if let Some(precision) = args.get(2) {
        config.set_rounding_precision(precision.parse()?);
    }

    pipeline::run_wealth_pipeline(&config)?;
    pipeline::run_collapse_pipeline(&config)?;

    Ok(())
}
