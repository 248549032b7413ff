//! Bot-only table simulator.
//!
//! Seats the default bot roster at one table, plays hands until the hand
//! limit, a single funded seat or Ctrl-C, then prints per-player results.

mod config;

use std::{
    collections::BTreeMap,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use anyhow::{Error, bail};
use ctrlc::set_handler;
use log::info;
use parlor_poker::{
    bot::roster,
    entities::{Usd, Username},
    table::{Bot, Controller, PlayerStats, Table, TableEvent},
    wallet::WalletManager,
};
use pico_args::Arguments;
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::Serialize;

use config::{Overrides, SimConfig};

const HELP: &str = "\
Simulate a table of poker bots

USAGE:
  pp_bots [OPTIONS]

OPTIONS:
  --hands      N           Hands to play               [default: env PP_HANDS or 100]
  --players    N           Bots at the table (2-10)    [default: env PP_PLAYERS or 6]
  --stakes     NAME        micro, low, small, medium,
                           high, premium or nosebleed  [default: env PP_STAKES or micro]
  --seed       N           Seed for a reproducible run [default: env PP_SEED or random]
  --bankroll   CHIPS       Starting wallet per bot     [default: env PP_BANKROLL or 5 buy-ins]

FLAGS:
  --json                   Print results as JSON
  -h, --help               Print help information

ENVIRONMENT:
  RUST_LOG                 Log level (e.g. info, debug)
";

#[derive(Debug, Serialize)]
struct PlayerReport {
    name: String,
    style: String,
    /// Wallet balance after everyone cashed out.
    balance: Usd,
    /// Balance minus the starting bankroll.
    net: i64,
    busted: bool,
    vpip: f32,
    pfr: f32,
    aggression: f32,
    stats: PlayerStats,
}

#[derive(Debug, Serialize)]
struct Report {
    stakes: String,
    seed: Option<u64>,
    hands_played: u64,
    players: Vec<PlayerReport>,
}

fn main() -> Result<(), Error> {
    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let overrides = Overrides {
        hands: pargs.opt_value_from_str("--hands")?,
        players: pargs.opt_value_from_str("--players")?,
        stakes: pargs.opt_value_from_str("--stakes")?,
        seed: pargs.opt_value_from_str("--seed")?,
        bankroll: pargs.opt_value_from_str("--bankroll")?,
    };
    let json = pargs.contains("--json");

    let config = SimConfig::from_env(overrides)?;
    config.validate()?;

    // Stop between hands on Ctrl-C.
    let running = Arc::new(AtomicBool::new(true));
    let handler_flag = running.clone();
    set_handler(move || handler_flag.store(false, Ordering::SeqCst))?;

    env_logger::builder().format_target(false).init();
    info!(
        "simulating {} hands with {} bots at {}",
        config.hands, config.players, config.stakes
    );

    let report = simulate(&config, &running)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn simulate(config: &SimConfig, running: &AtomicBool) -> Result<Report, Error> {
    let bots = roster(config.players);
    let mut wallet = WalletManager::new();
    for bot in &bots {
        wallet.create_wallet(&Username::new(&bot.name), config.bankroll)?;
    }

    let table_config = config.table_config();
    let (mut table, mut seeds) = match config.seed {
        Some(seed) => (
            Table::with_seed(table_config, wallet, seed)?,
            StdRng::seed_from_u64(seed),
        ),
        None => (Table::new(table_config, wallet)?, StdRng::from_os_rng()),
    };
    for bot in &bots {
        let controller = Controller::Bot(Bot::with_seed(bot.clone(), seeds.random()));
        table.join(&bot.name, controller)?;
    }

    let mut final_stats: BTreeMap<Username, PlayerStats> = BTreeMap::new();
    let mut busted: Vec<Username> = Vec::new();
    while table.hands_played() < config.hands {
        if !running.load(Ordering::SeqCst) {
            info!("interrupted after {} hands", table.hands_played());
            break;
        }
        if table.funded_seats() < 2 {
            info!("only one funded seat left");
            break;
        }

        table.start_hand()?;
        let summary = loop {
            match table.run()? {
                TableEvent::AwaitingAction { name, .. } => {
                    bail!("{name} is waiting for a human decision at a bot table")
                }
                TableEvent::ShowdownResolved(_) => {}
                TableEvent::HandComplete(summary) => break summary,
            }
        };

        let winners: Vec<String> = summary
            .winners
            .iter()
            .map(|(name, amount)| format!("{name} +${amount}"))
            .collect();
        let kind = if summary.showdown { "showdown" } else { "uncontested" };
        info!(
            "hand {} ({kind}): {}",
            table.hands_played(),
            winners.join(", ")
        );
        for departure in summary.departed {
            if departure.cashed_out == 0 {
                busted.push(departure.name.clone());
            }
            final_stats.insert(departure.name, departure.stats);
        }
    }

    // Cash everyone out so every chip is back in a wallet.
    let seated: Vec<(Username, PlayerStats)> = table
        .seats()
        .iter()
        .map(|seat| (seat.user.name.clone(), seat.stats.clone()))
        .collect();
    for (name, stats) in seated {
        table.leave(name.as_str())?;
        final_stats.insert(name, stats);
    }

    let mut players = Vec::with_capacity(bots.len());
    for bot in &bots {
        let name = Username::new(&bot.name);
        let balance = table.wallet().balance(&name)?;
        let stats = final_stats.remove(&name).unwrap_or_default();
        players.push(PlayerReport {
            name: bot.name.clone(),
            style: bot.style.to_string(),
            balance,
            net: i64::from(balance) - i64::from(config.bankroll),
            busted: busted.contains(&name),
            vpip: stats.vpip(),
            pfr: stats.pfr(),
            aggression: stats.aggression_factor(),
            stats,
        });
    }
    players.sort_by(|a, b| b.net.cmp(&a.net));

    Ok(Report {
        stakes: config.stakes.to_string(),
        seed: config.seed,
        hands_played: table.hands_played(),
        players,
    })
}

fn print_report(report: &Report) {
    println!(
        "{} hands at {}{}",
        report.hands_played,
        report.stakes,
        report
            .seed
            .map_or_else(String::new, |seed| format!(", seed {seed}"))
    );
    println!(
        "{:<18} {:<7} {:>9} {:>6} {:>6} {:>6} {:>6} {:>9}",
        "player", "style", "net", "hands", "won", "vpip", "pfr", "af"
    );
    for player in &report.players {
        let bust = if player.busted { " (busted)" } else { "" };
        println!(
            "{:<18} {:<7} {:>+9} {:>6} {:>6} {:>5.0}% {:>5.0}% {:>9.2}{bust}",
            player.name,
            player.style,
            player.net,
            player.stats.hands_played,
            player.stats.hands_won,
            player.vpip * 100.0,
            player.pfr * 100.0,
            player.aggression,
        );
    }
}
