use std::{fs::File, io::BufReader, path::Path, path::PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use ringloop::{
    CarouselEngine, EngineConfig, FixedMeasure, Key, Metrics, RingSpace,
};

#[derive(Parser, Debug)]
#[command(name = "ringloop", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a timed navigation script and print engine events.
    Run(RunArgs),
    /// Print the shortest ring path between two logical indices.
    Plan(PlanArgs),
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Input scenario JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Number of items on the ring.
    #[arg(long)]
    count: usize,

    /// Start logical index.
    #[arg(long)]
    from: usize,

    /// Target logical index.
    #[arg(long)]
    to: usize,
}

#[derive(Debug, serde::Deserialize)]
struct Scenario {
    items: Vec<String>,
    #[serde(default)]
    config: EngineConfig,
    #[serde(default)]
    metrics: Metrics,
    commands: Vec<TimedCommand>,
}

#[derive(Debug, serde::Deserialize)]
struct TimedCommand {
    at: u64,
    op: Op,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
enum Op {
    Next,
    Prev,
    Goto(usize),
    Swipe(f64),
    Key(Key),
    Resize,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Run(args) => cmd_run(args),
        Command::Plan(args) => cmd_plan(args),
    }
}

fn read_scenario(path: &Path) -> anyhow::Result<Scenario> {
    let f = File::open(path).with_context(|| format!("open scenario '{}'", path.display()))?;
    let r = BufReader::new(f);
    let scenario: Scenario =
        serde_json::from_reader(r).with_context(|| "parse scenario JSON")?;
    Ok(scenario)
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let scenario = read_scenario(&args.in_path)?;

    let mut engine = CarouselEngine::new(
        scenario.items,
        Box::new(FixedMeasure(scenario.metrics)),
        scenario.config,
    )?;
    engine.on_settle(|e| {
        println!(
            "settle  logical={} display={} item={}",
            e.logical_index, e.display_index, e.item
        );
    });
    engine.on_frame(|e| {
        println!(
            "frame   display={} offset={:.1} animate={}",
            e.display_index, e.offset_px, e.animate
        );
    });

    let mut commands = scenario.commands;
    commands.sort_by_key(|c| c.at);

    for cmd in &commands {
        drain_until(&mut engine, cmd.at);
        let accepted = match cmd.op {
            Op::Next => engine.next(cmd.at)?,
            Op::Prev => engine.prev(cmd.at)?,
            Op::Goto(i) => engine.goto(cmd.at, i)?,
            Op::Swipe(delta) => engine.end_swipe(cmd.at, delta)?,
            Op::Key(k) => engine.press_key(cmd.at, k)?,
            Op::Resize => {
                engine.signal_layout_changed(cmd.at);
                true
            }
        };
        if !accepted {
            println!("reject  at={} op={:?}", cmd.at, cmd.op);
        }
    }

    // Let everything still pending settle.
    while let Some(deadline) = engine.next_deadline() {
        engine.advance_to(deadline);
    }

    eprintln!(
        "done: logical={} display={} offset={:.1}",
        engine.current_logical_index(),
        engine.display_index(),
        engine.offset_px()
    );
    Ok(())
}

fn drain_until<T>(engine: &mut CarouselEngine<T>, at: u64) {
    while let Some(deadline) = engine.next_deadline() {
        if deadline > at {
            break;
        }
        engine.advance_to(deadline);
    }
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let ring = RingSpace::new(args.count, 1)?;
    if args.from >= args.count || args.to >= args.count {
        anyhow::bail!("--from/--to must be < --count");
    }
    let plan = ring.shortest_path(args.from, args.to);
    println!(
        "{} -> {}: {:?} x{}",
        args.from, args.to, plan.direction, plan.steps
    );
    Ok(())
}
