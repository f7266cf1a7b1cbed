//! tycoon: headless runner for Ship Tycoon.
//!
//! Usage:
//!   tycoon sim --ship feeder --origin rotterdam --destination hamburg --voyages 10
//!   tycoon play --data-dir ./data --tick-ms 80

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::json;
use shiptycoon_core::{engine::SimEngine, GameEvent, PlayerCommand, SimError, VoyageDriver};
use std::time::Duration;
use tokio::{
    io::{self, AsyncBufReadExt, BufReader},
    sync::broadcast::{self, error::RecvError},
};

/// Upper bound on timer steps for one voyage in headless mode.
const MAX_STEPS_PER_VOYAGE: u64 = 1_000;

#[derive(Debug, Parser)]
#[command(name = "tycoon", version)]
#[command(about = "Headless runner for the Ship Tycoon voyage simulator")]
struct Args {
    /// Directory holding game.json, ships.json and harbors.json
    #[arg(long, default_value = "./data", global = true)]
    data_dir: String,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// Buy one ship, sail a route repeatedly, print a summary
    Sim {
        #[arg(long, default_value = "feeder")]
        ship: String,

        #[arg(long, default_value = "rotterdam")]
        origin: String,

        #[arg(long, default_value = "hamburg")]
        destination: String,

        /// Number of voyages to sail
        #[arg(long, default_value_t = 10)]
        voyages: u64,

        /// Alternate direction on every other voyage
        #[arg(long)]
        round_trip: bool,
    },
    /// Real-time mode: one JSON command per stdin line, one JSON reply per stdout line
    Play {
        /// Override the timer period from game.json
        #[arg(long)]
        tick_ms: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let engine = SimEngine::build(&args.data_dir)?;

    match args.mode {
        Mode::Sim { ship, origin, destination, voyages, round_trip } => {
            println!("Ship Tycoon: sim");
            println!("  data_dir:  {}", args.data_dir);
            println!("  ship:      {ship}");
            println!("  route:     {origin} -> {destination}");
            println!("  voyages:   {voyages}");
            println!();
            run_sim(engine, &ship, &origin, &destination, voyages, round_trip)
        }
        Mode::Play { tick_ms } => run_ipc_loop(engine, tick_ms).await,
    }
}

fn run_sim(
    mut engine: SimEngine,
    ship: &str,
    origin: &str,
    destination: &str,
    voyages: u64,
    round_trip: bool,
) -> Result<()> {
    let starting_balance = engine.state().balance;
    engine.apply(&PlayerCommand::BuyShip { ship_id: ship.to_string() })?;
    engine.apply(&PlayerCommand::SelectShip { ship_id: ship.to_string() })?;

    let mut total_profit = 0;
    let mut completed = 0;
    for i in 0..voyages {
        let (from, to) = if round_trip && i % 2 == 1 {
            (destination, origin)
        } else {
            (origin, destination)
        };
        engine.apply(&PlayerCommand::StartVoyage {
            origin:      from.to_string(),
            destination: to.to_string(),
        })?;
        match engine.run_until_docked(MAX_STEPS_PER_VOYAGE)? {
            Some(profit) => {
                total_profit += profit;
                completed += 1;
                log::info!("voyage {} {from} -> {to} profit={profit}", i + 1);
            }
            None => log::warn!("voyage {} {from} -> {to} did not dock", i + 1),
        }
    }

    print_summary(&engine, starting_balance, completed, total_profit);
    Ok(())
}

fn print_summary(engine: &SimEngine, starting_balance: u64, completed: u64, total_profit: u64) {
    let state = engine.state();
    let avg = if completed > 0 { total_profit as f64 / completed as f64 } else { 0.0 };

    println!("=== RUN SUMMARY ===");
    println!("  ticks run:        {}", engine.clock.current_tick);
    println!("  voyages docked:   {completed}");
    println!("  total profit:     {total_profit}");
    println!("  avg per voyage:   {avg:.0}");
    println!("  starting balance: {starting_balance}");
    println!("  final balance:    {}", state.balance);

    println!();
    println!("=== FLEET ===");
    for (category, ships) in state.ships_by_category() {
        println!("  {}", category.label());
        for ship in ships {
            let marker = if state.selected.as_deref() == Some(ship.id.as_str()) {
                "*"
            } else if ship.owned {
                "+"
            } else {
                " "
            };
            println!(
                "   {marker} {:<30} {:>5}t {:>3}kn {:>6.1}/NM {:>9}",
                ship.name, ship.capacity, ship.speed, ship.profit_per_nm, ship.price
            );
        }
    }
}

async fn run_ipc_loop(engine: SimEngine, tick_ms: Option<u64>) -> Result<()> {
    let period = tick_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| engine.tick_interval());
    let driver = VoyageDriver::spawn_with_interval(engine, period);
    let notifier = tokio::spawn(notify_completions(driver.tick_events()));

    let mut lines = BufReader::new(io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let request: serde_json::Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(e) => {
                println!("{}", json!({ "error": { "kind": "bad_request", "message": e.to_string() } }));
                continue;
            }
        };

        let cmd = request["cmd"].as_str().map(str::to_owned);
        match cmd.as_deref() {
            Some("quit") => break,
            Some("get_state") => {
                println!("{}", json!({ "events": [], "state": driver.current() }));
            }
            _ => match serde_json::from_value::<PlayerCommand>(request) {
                Ok(command) => {
                    let reply = match driver.send(command).await {
                        Ok(events) => json!({ "events": events, "state": driver.current() }),
                        Err(e) => error_reply(&e),
                    };
                    println!("{reply}");
                }
                Err(e) => {
                    println!("{}", json!({ "error": { "kind": "bad_request", "message": e.to_string() } }));
                }
            },
        }
    }

    notifier.abort();
    let engine = driver.shutdown().await?;
    log::info!(
        "session ended at tick {} with balance {}",
        engine.clock.current_tick,
        engine.state().balance
    );
    Ok(())
}

fn error_reply(e: &SimError) -> serde_json::Value {
    json!({ "error": { "kind": e.kind(), "message": e.to_string() } })
}

/// Print a notification line whenever a voyage docks in the background.
async fn notify_completions(mut events: broadcast::Receiver<GameEvent>) {
    loop {
        match events.recv().await {
            Ok(event @ GameEvent::VoyageCompleted { .. }) => {
                println!("{}", json!({ "notification": event }));
            }
            Ok(_) => {}
            Err(RecvError::Lagged(n)) => log::warn!("notifier skipped {n} timer events"),
            Err(RecvError::Closed) => break,
        }
    }
}
