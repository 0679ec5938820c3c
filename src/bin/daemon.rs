use anyhow::Context;
use clap::Parser;
use sitewatch::config::Config;
use sitewatch::scheduler::Scheduler;
use sitewatch::storage::FileStateRepository;
use tracing::{debug, level_filters::LevelFilter, trace};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Parser)]
struct Args {
    /// Run a single probe cycle and exit
    #[arg(long)]
    once: bool,
}

fn init() {
    let filter = filter::Targets::new().with_targets(vec![
        ("sitewatch", LevelFilter::TRACE),
        ("daemon", LevelFilter::TRACE),
    ]);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact()
                .with_ansi(false),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init();

    let args = Args::parse();
    trace!("started with args: {args:?}");

    let config = Config::from_env();
    std::fs::create_dir_all(&config.base_dir).with_context(|| {
        format!(
            "failed to create base directory {}",
            config.base_dir.display()
        )
    })?;

    debug!(
        "monitoring {} every {}s",
        config.host_url,
        config.interval.as_secs()
    );

    let state_repo = Box::new(FileStateRepository::new(config.state_path()));
    let mut scheduler = Scheduler::new(config, state_repo).await?;

    if args.once {
        scheduler.tick().await;
    } else {
        scheduler.run().await;
    }

    Ok(())
}
