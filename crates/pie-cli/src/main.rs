mod config;
mod play;
mod render;
mod server;

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use pie_core::{BlockCount, factors, group_blocks, try_rectangle};
use rmcp::{ServiceExt, transport::stdio};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "pie", about = "Fraction circles: add, divide and amplify fractions")]
struct Cli {
    /// Config file (defaults to $PIE_CONFIG, then ~/.config/pie/pie.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start MCP server on stdio transport
    Serve,

    /// Run board commands from a script or stdin
    Play {
        /// Script file, one command per line
        #[arg(long)]
        script: Option<PathBuf>,
    },

    /// Split the blocks into groups of a given size
    Group {
        /// Blocks per group
        size: u32,

        /// Total blocks (defaults to the configured total)
        #[arg(long)]
        total: Option<u32>,
    },

    /// Try to arrange the blocks into a rectangle
    Rect {
        /// Number of columns
        columns: u32,

        /// Total blocks (defaults to the configured total)
        #[arg(long)]
        total: Option<u32>,
    },

    /// List the factors of the block total
    Factors {
        /// Total blocks (defaults to the configured total)
        #[arg(long)]
        total: Option<u32>,
    },
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = config::load(cli.config.as_deref()).context("failed to load config")?;

    match &cli.command {
        Commands::Serve => cmd_serve(&config).await,
        Commands::Play { script } => cmd_play(&config, script.as_ref()),
        Commands::Group { size, total } => cmd_group(&config, *size, *total),
        Commands::Rect { columns, total } => cmd_rect(&config, *columns, *total),
        Commands::Factors { total } => cmd_factors(&config, *total),
    }
}

fn block_total(config: &Config, total: Option<u32>) -> Result<BlockCount> {
    let blocks = match total {
        Some(n) => BlockCount::new(n),
        None => config.blocks(),
    };
    blocks.context("invalid block total")
}

async fn cmd_serve(config: &Config) -> Result<()> {
    tracing::info!(max_divisions = config.max_divisions, "starting MCP server");

    let server = server::PieServer::new(config).map_err(|e| anyhow::anyhow!("{e}"))?;
    let service = server
        .serve(stdio())
        .await
        .context("failed to start MCP server")?;
    service.waiting().await?;
    Ok(())
}

fn cmd_play(config: &Config, script: Option<&PathBuf>) -> Result<()> {
    let mut session = play::Session::new(config);
    let mut out = io::stdout().lock();
    let mut err = io::stderr().lock();

    let failures = match script {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open script {}", path.display()))?;
            play::run(&mut session, BufReader::new(file), &mut out, &mut err)?
        }
        None => play::run(&mut session, io::stdin().lock(), &mut out, &mut err)?,
    };

    let totals = session.board().workspace().totals();
    tracing::debug!(?totals, failures, "play session finished");

    if failures > 0 {
        bail!("{failures} command(s) failed");
    }
    Ok(())
}

fn cmd_group(config: &Config, size: u32, total: Option<u32>) -> Result<()> {
    let total = block_total(config, total)?;
    let grouping = group_blocks(total, size).context("cannot group blocks")?;
    print!("{}", render::grouping(&grouping));
    Ok(())
}

fn cmd_rect(config: &Config, columns: u32, total: Option<u32>) -> Result<()> {
    let total = block_total(config, total)?;
    let check = try_rectangle(total, columns).context("cannot arrange blocks")?;
    print!("{}", render::rectangle(&check));
    Ok(())
}

fn cmd_factors(config: &Config, total: Option<u32>) -> Result<()> {
    let total = block_total(config, total)?;
    let list: Vec<String> = factors(total).iter().map(u32::to_string).collect();
    println!("factors of {}: {}", total.get(), list.join(", "));
    Ok(())
}
