use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use traceplay::explain::{ExplanationEvent, ExplanationTrigger, HttpExplanationProvider, MockProvider};
use traceplay::playback::{Phase, PlaybackEvent, Player};
use traceplay::render::{render_step, RenderSurface, TextRenderer};
use traceplay::store::document;
use traceplay::trace::demo;
use traceplay::{util, ExplanationProvider, PlaybackConfig};

#[derive(Parser)]
#[command(name = "traceplay", about = "Algorithm execution trace playback engine")]
struct Cli {
    /// Custom data directory (default ~/.traceplay)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DemoFamily {
    Sorting,
    BinarySearch,
    Sieve,
}

#[derive(Subcommand)]
enum Command {
    /// Produce a demo run and write it as a JSONL document
    Demo {
        #[arg(long, value_enum, default_value = "sorting")]
        family: DemoFamily,
        /// Output path for the run document
        #[arg(long)]
        out: PathBuf,
    },
    /// Print header and step count of a run document
    Info { path: PathBuf },
    /// Play a run document to the terminal
    Play {
        path: PathBuf,
        /// Speed multiplier in [0.25, 8]
        #[arg(long, default_value_t = 1.0)]
        speed: f64,
        /// Explanation endpoint; omitted = offline mock
        #[arg(long)]
        explain_endpoint: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    util::init_data_dir(cli.data_dir.clone());

    // Log to file (~/.traceplay/logs/traceplay.log)
    fs::create_dir_all(util::logs_dir())?;
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(util::log_file_path())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .init();

    match cli.command {
        Command::Demo { family, out } => demo_command(family, out),
        Command::Info { path } => info_command(path),
        Command::Play {
            path,
            speed,
            explain_endpoint,
        } => play_command(path, speed, explain_endpoint).await,
    }
}

fn demo_command(family: DemoFamily, out: PathBuf) -> Result<()> {
    let run = match family {
        DemoFamily::Sorting => demo::bubble_sort_run(&[5.0, 3.0, 1.0, 4.0, 2.0]),
        DemoFamily::BinarySearch => {
            demo::binary_search_run(&[1.0, 3.0, 4.0, 5.0, 7.0, 9.0, 11.0], 7.0)
        }
        DemoFamily::Sieve => demo::sieve_run(30),
    };
    document::write_jsonl_to_path(&run, &out)
        .with_context(|| format!("failed to write {}", out.display()))?;
    println!("wrote {} ({} steps) to {}", run.family, run.steps.len(), out.display());
    Ok(())
}

fn info_command(path: PathBuf) -> Result<()> {
    let run = document::read_jsonl_from_path(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    println!("run      {}", run.id);
    println!("family   {}", run.family.label());
    println!("created  {}", run.created_at.to_rfc3339());
    println!("steps    {}", run.steps.len());
    Ok(())
}

async fn play_command(path: PathBuf, speed: f64, explain_endpoint: Option<String>) -> Result<()> {
    let run = Arc::new(
        document::read_jsonl_from_path(&path)
            .with_context(|| format!("failed to read {}", path.display()))?,
    );

    let config = PlaybackConfig::default();
    let player = Player::spawn(config.clone());
    let mut positions = player.subscribe();

    let provider: Arc<dyn ExplanationProvider> = match explain_endpoint {
        Some(endpoint) => Arc::new(HttpExplanationProvider::new(endpoint)),
        None => Arc::new(MockProvider::new()),
    };
    let (_trigger, mut explanations) =
        ExplanationTrigger::spawn(provider, player.subscribe(), config.explain_settle);

    player.bind(run)?;
    player.set_speed(speed)?;
    player.play()?;

    let mut surface = TextRenderer::new(std::io::stdout());
    loop {
        tokio::select! {
            event = positions.recv() => {
                let Some(PlaybackEvent::PositionChanged { run, index, finished, .. }) = event else {
                    break;
                };
                if let Some(step) = run.steps.get(index) {
                    let model = render_step(&step.state, None);
                    surface.present(step, &model);
                }
                if finished {
                    break;
                }
            }
            explanation = explanations.recv() => {
                match explanation {
                    Some(ExplanationEvent::Ready { key, text }) => {
                        println!("  [explain {}#{}] {text}", key.0, key.1);
                    }
                    Some(ExplanationEvent::Unavailable { key }) => {
                        println!("  [explain {}#{}] unavailable", key.0, key.1);
                    }
                    None => {}
                }
            }
        }
    }

    // Drain the last settled explanation before exiting
    tokio::time::sleep(config.explain_settle * 2).await;
    while let Ok(event) = explanations.try_recv() {
        if let ExplanationEvent::Ready { key, text } = event {
            println!("  [explain {}#{}] {text}", key.0, key.1);
        }
    }

    if player.phase() == Phase::Finished {
        println!("playback finished");
    }
    Ok(())
}
