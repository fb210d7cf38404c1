//! vidscout - direct video link finder
//!
//! Main entry point for the server and the one-shot CLI.

use clap::Parser;
use vidscout::core::ExtractTarget;
use vidscout::{Config, ExtractionPipeline};

/// vidscout - find direct video links for a page or a search query
#[derive(Parser, Debug)]
#[command(name = "vidscout")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on (overrides PORT)
    #[arg(long, short = 'p')]
    port: Option<u16>,

    /// Address to bind (overrides HOST)
    #[arg(long)]
    host: Option<String>,

    /// Enable debug output
    #[arg(long, short = 'd')]
    debug: bool,

    /// Disable the browser fallback
    #[arg(long)]
    no_browser: bool,

    /// Run the browser in headed mode (visible window)
    #[arg(long)]
    headed: bool,

    /// Extract links for one page and exit
    #[arg(long, short = 'u', conflicts_with = "query")]
    url: Option<String>,

    /// Search, extract links and exit
    #[arg(long, short = 'q')]
    query: Option<String>,

    /// Print the default configuration file and exit
    #[arg(long)]
    print_config: bool,

    /// Write the effective configuration to the config file and exit
    #[arg(long)]
    save_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_config {
        println!("{}", Config::default_config_toml());
        return Ok(());
    }

    // Build configuration
    let mut config = Config::load()?;

    // Apply CLI overrides
    if let Some(port) = args.port {
        config.server.port = port;
    }

    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }

    if args.debug {
        config.logging.debug = true;
    }

    if args.no_browser {
        config.browser.enabled = false;
    }

    if args.headed {
        config.browser.headed = true;
    }

    vidscout::logging::init_logger(config.logging.debug);

    if args.save_config {
        let path = config.save()?;
        println!("Configuration written to {}", path.display());
        return Ok(());
    }

    // One-shot mode
    if let Some(target) = ExtractTarget::from_parts(args.url.as_deref(), args.query.as_deref()) {
        let pipeline = ExtractionPipeline::from_config(&config)?;
        let response = pipeline.run(&target, None).await;
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    vidscout::serve(&config).await?;

    Ok(())
}
