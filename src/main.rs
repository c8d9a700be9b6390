//! lansniff - capture, decode and publish recent network traffic.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use lansniff::publisher::render_snapshot;
use lansniff::{
    load_snapshot, CapturePipeline, Config, ConsolePublisher, FrameSource, JsonFilePublisher,
    PnetCapture, SnapshotPublisher,
};

#[derive(Parser)]
#[command(name = "lansniff")]
#[command(about = "Decode live traffic and publish the last 50 packets as JSON")]
struct Cli {
    /// Config file (default: /etc/lansniff.conf if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Capture frames and keep the snapshot file up to date
    Capture {
        /// Network interface (default: first interface that is up and not loopback)
        #[arg(short, long)]
        interface: Option<String>,
        /// Snapshot file path
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print each accepted packet
        #[arg(long)]
        console: bool,
        /// Include Ethernet details in console output
        #[arg(short, long)]
        verbose: bool,
    },
    /// List network interfaces
    Interfaces,
    /// Print a published snapshot
    Show {
        /// Snapshot file path
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Reload and redraw every second until Ctrl+C
        #[arg(short, long)]
        follow: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config);
    for key in &config.unknown_keys {
        tracing::warn!("Ignoring unknown config key '{}'", key);
    }

    let result = match cli.command {
        Commands::Capture {
            interface,
            output,
            console,
            verbose,
        } => {
            let mut config = config;
            if interface.is_some() {
                config.interface = interface;
            }
            if let Some(output) = output {
                config.output = output;
            }
            config.console |= console;
            capture(&config, verbose)
        }
        Commands::Interfaces => {
            for iface in PnetCapture::list_interfaces() {
                println!("{}", iface);
            }
            Ok(())
        }
        Commands::Show { output, follow } => {
            let path = output.unwrap_or(config.output);
            if follow {
                follow_snapshot(&path)
            } else {
                show(&path)
            }
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.tracing_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn capture(config: &Config, verbose: bool) -> Result<()> {
    let mut source = match &config.interface {
        Some(name) => PnetCapture::open(name),
        None => PnetCapture::open_default(),
    }
    .context("failed to open capture")?;

    let mut publishers: Vec<Box<dyn SnapshotPublisher>> =
        vec![Box::new(JsonFilePublisher::new(&config.output))];
    if config.console {
        publishers.push(Box::new(ConsolePublisher::new().with_verbose(verbose)));
    }

    let mut pipeline = CapturePipeline::new(publishers);
    pipeline
        .start(source.name())
        .with_context(|| format!("failed to initialise {}", config.output.display()))?;

    let running = shutdown_flag()?;

    tracing::info!(
        "Capturing on {} (ARP + IPv4/TCP/UDP/ICMP), snapshot at {}",
        source.name(),
        config.output.display()
    );

    let stats = pipeline.run(&mut source, &running);
    if stats.read_errors > 0 {
        tracing::warn!("{} reads failed during capture", stats.read_errors);
    }
    Ok(())
}

/// Flag cleared by Ctrl+C.
fn shutdown_flag() -> Result<Arc<AtomicBool>> {
    let running = Arc::new(AtomicBool::new(true));
    let handler_flag = running.clone();
    ctrlc::set_handler(move || {
        handler_flag.store(false, Ordering::SeqCst);
    })
    .context("failed to install Ctrl+C handler")?;
    Ok(running)
}

fn show(path: &Path) -> Result<()> {
    let records = load_snapshot(path)
        .with_context(|| format!("failed to read snapshot {}", path.display()))?;
    println!("{}", render_snapshot(&records));
    Ok(())
}

const REFRESH_INTERVAL: Duration = Duration::from_secs(1);
const TICK: Duration = Duration::from_millis(100);

/// Redraw the snapshot every second until Ctrl+C.
///
/// A snapshot that cannot be read (for example mid-restart of the capture)
/// is reported in place and retried on the next refresh.
fn follow_snapshot(path: &Path) -> Result<()> {
    let running = shutdown_flag()?;

    while running.load(Ordering::SeqCst) {
        let body = match load_snapshot(path) {
            Ok(records) => render_snapshot(&records),
            Err(e) => format!("Cannot read {}: {}", path.display(), e),
        };

        let mut stdout = io::stdout().lock();
        // Clear screen, cursor home
        write!(stdout, "\x1b[2J\x1b[H")?;
        writeln!(stdout, "{} (refreshing every second, Ctrl+C to stop)\n", path.display())?;
        writeln!(stdout, "{}", body)?;
        stdout.flush()?;
        drop(stdout);

        let mut waited = Duration::ZERO;
        while waited < REFRESH_INTERVAL && running.load(Ordering::SeqCst) {
            thread::sleep(TICK);
            waited += TICK;
        }
    }
    Ok(())
}
