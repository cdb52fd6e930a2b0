use crate::battle::{resolve_battle_from_dice, BattleConfig, SplitMixDice, DICE_PER_BATTLE};
use crate::server;
use crate::settings::Settings;
use crate::stats::{exact_stats, run_monte_carlo_parallel, AggregateStats};

const USAGE: &str = "usage: antietam <exact|monte-carlo|resolve|serve>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    Exact,
    MonteCarlo,
    Resolve,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("serve") => Some(Command::Serve),
        Some("exact") => Some(Command::Exact),
        Some("monte-carlo") => Some(Command::MonteCarlo),
        Some("resolve") => Some(Command::Resolve),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    let settings = Settings::from_env();
    match parse_command(args) {
        Some(Command::Serve) => handle_serve(&settings),
        Some(Command::Exact) => handle_exact(args),
        Some(Command::MonteCarlo) => handle_monte_carlo(args, &settings),
        Some(Command::Resolve) => handle_resolve(args),
        None => {
            eprintln!("{USAGE}");
            2
        }
    }
}

/// Positional arguments after the subcommand, plus the parsed battle flags.
struct Invocation<'a> {
    positional: Vec<&'a str>,
    battle: BattleConfig,
    as_table: bool,
}

fn parse_invocation(args: &[String]) -> Result<Invocation<'_>, String> {
    let mut positional = Vec::new();
    let mut battle = BattleConfig::default();
    let mut as_table = false;

    for arg in args.iter().skip(2) {
        let Some(flag) = arg.strip_prefix("--") else {
            positional.push(arg.as_str());
            continue;
        };
        let (name, value) = match flag.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (flag, None),
        };
        match (name, value) {
            ("table", None) => as_table = true,
            ("fort", None) => battle.fort_present = true,
            ("interception", None) => battle.interception = true,
            ("capital", None) => battle.resource_or_capital = true,
            ("defender-leader-present", None) => battle.defender_leader_present = true,
            ("attacker-oos", None) => battle.attacker_out_of_supply = true,
            ("defender-oos", None) => battle.defender_out_of_supply = true,
            ("amphibious", None) => battle.amphibious = true,
            ("attacker-leader", Some(raw)) => battle.attacker_leader_drm = parse_value(name, raw)?,
            ("defender-leader", Some(raw)) => battle.defender_leader_drm = parse_value(name, raw)?,
            ("attacker-elites", Some(raw)) => battle.attacker_elites = parse_value(name, raw)?,
            ("defender-elites", Some(raw)) => battle.defender_elites = parse_value(name, raw)?,
            _ => return Err(format!("unknown flag '{arg}'")),
        }
    }

    Ok(Invocation {
        positional,
        battle,
        as_table,
    })
}

fn parse_value<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T, String> {
    raw.parse::<T>()
        .map_err(|_| format!("invalid {name} '{raw}'"))
}

/// Reads the two unit counts and checks the elite limit.
fn battle_from(invocation: &Invocation<'_>, command: &str) -> Result<BattleConfig, String> {
    let [attacker, defender, ..] = &invocation.positional[..] else {
        return Err(format!(
            "usage: antietam {command} <attacker_size> <defender_size> [flags]"
        ));
    };
    let mut battle = invocation.battle;
    battle.attacker_size = parse_value("attacker_size", attacker)?;
    battle.defender_size = parse_value("defender_size", defender)?;
    battle.validate().map_err(|err| err.to_string())?;
    Ok(battle)
}

fn handle_serve(settings: &Settings) -> i32 {
    match server::run_server(settings) {
        Ok(()) => 0,
        Err(err) => {
            tracing::error!(%err, "server error");
            eprintln!("server error: {err}");
            1
        }
    }
}

fn handle_exact(args: &[String]) -> i32 {
    let (invocation, battle) = match parse_with_battle(args, "exact") {
        Ok(parsed) => parsed,
        Err(code) => return code,
    };

    match exact_stats(&battle) {
        Ok(stats) => {
            if invocation.as_table {
                print_stats_table(&stats, None);
                0
            } else {
                print_json(&stats)
            }
        }
        Err(err) => {
            eprintln!("exact statistics failed: {err}");
            1
        }
    }
}

fn handle_monte_carlo(args: &[String], settings: &Settings) -> i32 {
    let (invocation, battle) = match parse_with_battle(args, "monte-carlo") {
        Ok(parsed) => parsed,
        Err(code) => return code,
    };

    let exponent = match invocation.positional.get(2) {
        Some(raw) => match parse_value::<u32>("trials_exponent", raw) {
            Ok(exponent) => exponent,
            Err(msg) => return usage_error(&msg),
        },
        None => settings.trials_exponent,
    };
    let seed = match invocation.positional.get(3) {
        Some(raw) => match parse_value::<u64>("seed", raw) {
            Ok(seed) => seed,
            Err(msg) => return usage_error(&msg),
        },
        None => match SplitMixDice::from_entropy() {
            Ok(mut dice) => dice.next_u64(),
            Err(err) => {
                eprintln!("{err}");
                return 1;
            }
        },
    };

    match run_monte_carlo_parallel(&battle, exponent, seed, &settings.pool) {
        Ok(run) => {
            if invocation.as_table {
                print_stats_table(&run.stats, Some((run.trials, seed)));
                0
            } else {
                print_json(&serde_json::json!({
                    "trials": run.trials,
                    "seed": seed,
                    "stats": run.stats,
                }))
            }
        }
        Err(err) => {
            eprintln!("monte carlo run failed: {err}");
            1
        }
    }
}

fn handle_resolve(args: &[String]) -> i32 {
    let (invocation, battle) = match parse_with_battle(args, "resolve") {
        Ok(parsed) => parsed,
        Err(code) => return code,
    };

    let raw_dice = invocation.positional.get(2..).unwrap_or_default();
    if raw_dice.len() != DICE_PER_BATTLE {
        return usage_error(
            "usage: antietam resolve <attacker_size> <defender_size> <attacker_roll> <defender_roll> <attacker_leader_roll> <defender_leader_roll> [flags]",
        );
    }
    let mut dice = Vec::with_capacity(DICE_PER_BATTLE);
    for raw in raw_dice {
        match parse_value::<u8>("die", raw) {
            Ok(value @ 1..=6) => dice.push(value),
            Ok(_) => return usage_error(&format!("die '{raw}' must be between 1 and 6")),
            Err(msg) => return usage_error(&msg),
        }
    }

    match resolve_battle_from_dice(&battle, &dice) {
        Ok(outcome) => {
            if invocation.as_table {
                println!("winner\tdamage_to_attacker\tdamage_to_defender\tstar\toverrun\tattacker_can_continue");
                println!(
                    "{}\t{}\t{}\t{}\t{}\t{}",
                    outcome.winner,
                    outcome.damage_to_attacker,
                    outcome.damage_to_defender,
                    outcome.star,
                    outcome.overrun,
                    outcome.attacker_can_continue
                );
                0
            } else {
                print_json(&outcome)
            }
        }
        Err(err) => {
            eprintln!("resolution failed: {err}");
            1
        }
    }
}

fn parse_with_battle<'a>(
    args: &'a [String],
    command: &str,
) -> Result<(Invocation<'a>, BattleConfig), i32> {
    let invocation = parse_invocation(args).map_err(|msg| usage_error(&msg))?;
    let battle = battle_from(&invocation, command).map_err(|msg| usage_error(&msg))?;
    Ok((invocation, battle))
}

fn usage_error(msg: &str) -> i32 {
    eprintln!("{msg}");
    2
}

fn print_json<T: serde::Serialize>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize result: {err}");
            1
        }
    }
}

fn print_stats_table(stats: &AggregateStats, run: Option<(usize, u64)>) {
    let (trials, seed) = match run {
        Some((trials, seed)) => (trials.to_string(), seed.to_string()),
        None => ("exact".to_string(), "-".to_string()),
    };
    println!("battle_size\ttrials\tseed\tattacker_win\tdefender_win\tmean_hits_to_defender\tmean_hits_to_attacker\tstar\toverrun");
    println!(
        "{}\t{}\t{}\t{:.6}\t{:.6}\t{:.6}\t{:.6}\t{:.6}\t{:.6}",
        stats.battle_size,
        trials,
        seed,
        stats.attacker_win_probability,
        stats.defender_win_probability,
        stats.hits.to_defender.mean,
        stats.hits.to_attacker.mean,
        stats.star_probability,
        stats.overrun_probability
    );
}
