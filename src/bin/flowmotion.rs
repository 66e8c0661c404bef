use std::{
    fs::File,
    io::{BufReader, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use flowmotion::{
    ActionRegistry, EngineConfig, Flow, FlowId, PlayOutcome, PlaybackEvent, Project,
    RunEnd, Scheduler, SeededRandom, StateSink, TimerQueue,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "flowmotion", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the registered action kinds.
    Actions,
    /// Compile a flow into its step table and print it as JSON.
    Compile(CompileArgs),
    /// Play a flow and print playback events as JSON lines.
    Play(PlayArgs),
}

#[derive(Parser, Debug)]
struct ProjectArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Flow to use (defaults to the project's active flow).
    #[arg(long)]
    flow: Option<String>,

    /// Engine config JSON (defaults apply to anything missing).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for random actions. Without it every run is different.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Parser, Debug)]
struct CompileArgs {
    #[command(flatten)]
    project: ProjectArgs,

    /// Write the table here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct PlayArgs {
    #[command(flatten)]
    project: ProjectArgs,

    /// Skip the waiting and fire every timer immediately.
    #[arg(long)]
    instant: bool,

    /// Stop after this many timer wakeups (guards against endless repeats).
    #[arg(long, default_value_t = 10_000)]
    max_wakeups: usize,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Actions => cmd_actions(),
        Command::Compile(args) => cmd_compile(args),
        Command::Play(args) => cmd_play(args).await,
    }
}

/// Everything a command needs, loaded from the shared `--in/--flow/--config/--seed` flags.
struct Loaded {
    project: Project,
    flow: Flow,
    config: EngineConfig,
    rng: SeededRandom,
}

fn load(args: &ProjectArgs) -> anyhow::Result<Loaded> {
    let project = read_project_json(&args.in_path)?;
    let flow = match &args.flow {
        Some(id) => project
            .flows
            .get(&FlowId::from(id.as_str()))
            .with_context(|| format!("no flow '{id}' in '{}'", args.in_path.display()))?,
        None => project
            .flows
            .active()
            .context("project has no active flow")?,
    }
    .clone();
    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let rng = match args.seed {
        Some(seed) => SeededRandom::new(seed),
        None => SeededRandom::from_entropy(),
    };
    Ok(Loaded {
        project,
        flow,
        config,
        rng,
    })
}

fn read_project_json(path: &Path) -> anyhow::Result<Project> {
    let f = File::open(path).with_context(|| format!("open project '{}'", path.display()))?;
    let r = BufReader::new(f);
    let project: Project =
        serde_json::from_reader(r).with_context(|| "parse project JSON")?;
    project.validate()?;
    Ok(project)
}

fn cmd_actions() -> anyhow::Result<()> {
    let registry = ActionRegistry::with_builtins();
    let mut out = std::io::stdout().lock();
    for (kind, repeat) in registry.kinds() {
        if repeat {
            writeln!(out, "{kind}\t(repeat)")?;
        } else {
            writeln!(out, "{kind}")?;
        }
    }
    Ok(())
}

fn cmd_compile(args: CompileArgs) -> anyhow::Result<()> {
    let Loaded {
        project,
        flow,
        config,
        mut rng,
    } = load(&args.project)?;
    let registry = ActionRegistry::with_builtins();
    let table = flowmotion::StepCompiler::new(&registry, &config).compile(
        &flow.blocks,
        &project.stage.actor_ids(),
        &project.stage.current_states(),
        &mut rng,
    );
    for skipped in table.skipped() {
        eprintln!(
            "skipped {} ({}): {:?}",
            skipped.block, skipped.action, skipped.reason
        );
    }

    let json = serde_json::to_string_pretty(&table).context("serialize step table")?;
    match &args.out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            std::fs::write(path, json)
                .with_context(|| format!("write step table '{}'", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

async fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    let Loaded {
        mut project,
        flow,
        config,
        rng,
    } = load(&args.project)?;
    let mut scheduler = Scheduler::new(ActionRegistry::with_builtins(), config, rng);
    let mut queue = TimerQueue::new();

    let outcome = scheduler.play(&flow, &mut project.stage, &mut queue)?;
    if outcome == PlayOutcome::Empty {
        eprintln!("flow '{}' has nothing to play", flow.id);
        return Ok(());
    }

    let mut stdout = std::io::stdout().lock();
    let mut emit = |event: PlaybackEvent| {
        if let Ok(line) = serde_json::to_string(&event) {
            // A closed pipe only loses output; playback itself carries on.
            let _ = writeln!(stdout, "{line}");
        }
    };

    if args.instant {
        flowmotion::drain(
            &mut scheduler,
            &mut project.stage,
            &mut queue,
            args.max_wakeups,
            &mut emit,
        );
        if scheduler.is_running() {
            scheduler.stop(&mut project.stage, &mut queue);
            for event in scheduler.take_events() {
                emit(event);
            }
        }
    } else {
        let cancel = cancel_on(tokio::signal::ctrl_c());
        let end = flowmotion::run_realtime(
            &mut scheduler,
            &mut project.stage,
            &mut queue,
            cancel,
            &mut emit,
        )
        .await;
        if end == RunEnd::Cancelled {
            eprintln!("interrupted");
        }
    }

    eprintln!(
        "played {} repeat run(s), {} timer(s) left",
        scheduler.repeat_count(),
        queue.len()
    );
    Ok(())
}

/// Resolve when `signal` fires. If the handler cannot be installed, never
/// resolve, so playback runs to completion instead of stopping at once.
async fn cancel_on(signal: impl Future<Output = std::io::Result<()>>) {
    if let Err(err) = signal.await {
        tracing::warn!(%err, "cannot listen for Ctrl-C; playback will not be interruptible");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/bin/flowmotion.rs"]
mod tests;
