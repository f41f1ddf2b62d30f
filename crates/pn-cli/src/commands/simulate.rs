use std::fs;
use std::path::PathBuf;

use colored::Colorize;
use comfy_table::{Cell, Color, ContentArrangement, Table};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use pn_core::{Candle, MarketConfig, PriceSnapshot, PriceState};

pub struct SimulateArgs {
    pub ticks: usize,
    pub seed: u64,
    pub initial_price: f64,
    pub volatility: f64,
    pub trends: Vec<String>,
    pub candle: usize,
    pub output: Option<PathBuf>,
}

/// A trend injected before the given tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
struct Injection {
    tick: usize,
    score: f64,
}

#[derive(Serialize)]
struct Report<'a> {
    seed: u64,
    market: &'a MarketConfig,
    injections: &'a [Injection],
    history: &'a [f64],
    candles: &'a [Candle],
    last: PriceSnapshot,
}

fn parse_injection(spec: &str) -> Result<Injection, String> {
    let (score, tick) = spec
        .split_once('@')
        .ok_or_else(|| format!("invalid trend '{spec}': expected SCORE@TICK"))?;
    let score: f64 = score
        .trim()
        .parse()
        .map_err(|_| format!("invalid trend score '{score}'"))?;
    if !(-1.0..=1.0).contains(&score) {
        return Err(format!("trend score {score} is outside [-1, 1]"));
    }
    let tick = tick
        .trim()
        .parse()
        .map_err(|_| format!("invalid trend tick '{tick}'"))?;
    Ok(Injection { tick, score })
}

pub fn run(args: &SimulateArgs) -> Result<(), String> {
    let mut injections = args
        .trends
        .iter()
        .map(|s| parse_injection(s))
        .collect::<Result<Vec<_>, _>>()?;
    injections.sort_by_key(|i| i.tick);
    if let Some(late) = injections.iter().find(|i| i.tick >= args.ticks) {
        return Err(format!(
            "trend at tick {} is past the end of a {}-tick run",
            late.tick, args.ticks
        ));
    }

    let market = MarketConfig::default()
        .with_initial_price(args.initial_price)
        .with_volatility(args.volatility);
    let mut rng = StdRng::seed_from_u64(args.seed);
    let mut state = PriceState::new(&market);

    let mut pending = injections.iter().peekable();
    for tick in 0..args.ticks {
        while let Some(injection) = pending.next_if(|i| i.tick == tick) {
            state.apply_trend(injection.score, &mut rng);
        }
        state.advance(&mut rng);
    }

    let candles = state.candles(args.candle);
    let last = state.snapshot();

    println!(
        "  {} {}",
        "Market Simulation".bold(),
        format!(
            "({} ticks, seed={}, volatility={})",
            args.ticks, args.seed, market.volatility
        )
        .dimmed()
    );
    for injection in &injections {
        println!(
            "  {} {:+.2} at tick {}",
            "Trend".cyan(),
            injection.score,
            injection.tick
        );
    }
    println!();

    if !candles.is_empty() {
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Ticks", "Open", "High", "Low", "Close"]);
        let width = args.candle.max(1);
        for candle in &candles {
            let end = (candle.tick + width).min(state.ticks());
            let color = if candle.is_up() { Color::Green } else { Color::Red };
            table.add_row(vec![
                Cell::new(format!("{}-{}", candle.tick + 1, end)),
                Cell::new(format!("{:.2}", candle.open)),
                Cell::new(format!("{:.2}", candle.high)),
                Cell::new(format!("{:.2}", candle.low)),
                Cell::new(format!("{:.2}", candle.close)).fg(color),
            ]);
        }
        println!("{table}");
        println!();
    }

    println!(
        "  Final price: {}",
        super::format_price(last.price, last.change_percent)
    );
    if last.trend_remaining_steps > 0 {
        println!(
            "  Trend {:+.2} with {} ticks remaining",
            last.trend, last.trend_remaining_steps
        );
    }
    if last.price == 0.0 {
        println!("  {}", "BANKRUPT".red().bold());
    }

    if let Some(path) = &args.output {
        let report = Report {
            seed: args.seed,
            market: &market,
            injections: &injections,
            history: state.history(),
            candles: &candles,
            last,
        };
        let json = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
        fs::write(path, json).map_err(|e| format!("cannot write {}: {e}", path.display()))?;
        println!("  Wrote {}", path.display());
    }

    Ok(())
}
