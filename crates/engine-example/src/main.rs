mod cli;
mod sources_config;


use crate::cli::Cli;
use crate::sources_config::SourcesConfig;
use anyhow::{anyhow, bail, Context};
use clap::Parser;
use sweep_engine::{Engine, Row};
use tracing::info;


fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .init();
}


fn format_row(row: &Row<i64, String>, names: &[String]) -> String {
    let matches: Vec<_> = row.matches.iter()
        .map(|m| format!("{}:({}-{})", names[m.source], m.src_start, m.src_end))
        .collect();
    format!("{:>4}  {}  {}", row.position, row.span, matches.join("  "))
}


fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    init_logging();

    let config = SourcesConfig::read_config_file(&args.input)
        .with_context(|| format!("failed to read sources from {}", args.input))?;

    let engine = Engine::ordered(args.options(config.options));
    let mut driver = engine.driver();
    let mut names = Vec::with_capacity(config.sources.len());
    let mut producers = Vec::new();

    for source in config.sources {
        names.push(source.name.clone());
        let mut spans = source.build_spans(&engine)?;
        let cursor = if args.threaded {
            if engine.options().sort {
                engine.sort(&mut spans);
            }
            let (cursor, _, producer) = engine.spawn_feed(spans);
            producers.push(producer);
            cursor
        } else {
            engine.slice_source(spans)
        };
        driver.add_source(cursor);
    }

    info!(sources = names.len(), threaded = args.threaded, "starting sweep");

    for row in driver.iter() {
        println!("{}", format_row(&row, &names));
    }

    for producer in producers {
        producer.join().map_err(|_| anyhow!("producer thread panicked"))?;
    }

    if let (Some(error), Some(source)) = (driver.error(), driver.error_source()) {
        bail!("source '{}' failed: {}", names[source], error)
    }

    Ok(())
}
