use std::fs;
use std::path::{Path, PathBuf};

use colored::Colorize;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use pn_core::{GAME_DURATIONS, format_remaining};
use pn_dialogue::{
    DialogueConfig, DialogueService, Evaluation, FfmpegTranscoder, OpenAiDialogue,
    PassthroughTranscoder, ScriptedDialogue, Transcoder,
};
use pn_game::{Game, GameConfig, GameSummary, load_recording};

pub struct PlayArgs {
    pub offline: bool,
    pub seed: u64,
    pub duration: u64,
    pub tick_ms: u64,
    pub raw_wav: bool,
    pub transcript: Option<PathBuf>,
}

const HELP: &str = "\
  hands            list reporters with a raised hand
  ask <n>          call on the n-th raised hand
  answer <file>    answer the reporter with a recorded audio file
  status           price, trend, and time left
  transcript       show the conversation so far
  quit             end the press conference";

/// Scores for offline play: a seeded mix of good and bad answers, with the
/// reporter sitting down after every third one.
fn offline_script(seed: u64) -> ScriptedDialogue {
    let mut rng = StdRng::seed_from_u64(seed);
    let script = ScriptedDialogue::new().with_fallback(0.0, false);
    for i in 0..60 {
        let score: f64 = rng.random_range(-1.0..=1.0);
        script.push(Ok(Evaluation::new(score, i % 3 == 2)));
    }
    script
}

pub fn run(args: &PlayArgs) -> Result<(), String> {
    if !GAME_DURATIONS.contains(&args.duration) {
        return Err(format!("duration must be one of {GAME_DURATIONS:?} seconds"));
    }
    let config = GameConfig::default()
        .with_seed(args.seed)
        .with_duration_secs(args.duration)
        .with_tick_interval_ms(args.tick_ms);

    debug!(
        offline = args.offline,
        seed = args.seed,
        duration = args.duration,
        "starting press conference"
    );
    let runtime = tokio::runtime::Runtime::new().map_err(|e| e.to_string())?;
    runtime.block_on(async {
        if args.offline {
            let service = offline_script(args.seed);
            with_transcoder(service, config, args).await
        } else {
            let dialogue = DialogueConfig::from_env().map_err(|e| e.to_string())?;
            let service = OpenAiDialogue::new(dialogue).map_err(|e| e.to_string())?;
            with_transcoder(service, config, args).await
        }
    })
}

async fn with_transcoder<S: DialogueService>(
    service: S,
    config: GameConfig,
    args: &PlayArgs,
) -> Result<(), String> {
    if args.raw_wav {
        play(service, PassthroughTranscoder, config, args.transcript.as_deref()).await
    } else {
        play(service, FfmpegTranscoder::new(), config, args.transcript.as_deref()).await
    }
}

async fn play<S: DialogueService, T: Transcoder>(
    service: S,
    transcoder: T,
    config: GameConfig,
    transcript: Option<&Path>,
) -> Result<(), String> {
    let mut game = Game::new(service, transcoder, config).map_err(|e| e.to_string())?;
    let company = game.start_game().await.map_err(|e| e.to_string())?.clone();

    println!(
        "  {} {}, CEO of {}",
        "You are".bold(),
        company.ceo_name.bold(),
        company.company_name.bold()
    );
    println!("  {}", company.company_background.dimmed());
    println!(
        "  {} Type 'help' for commands, 'quit' to end.\n",
        format!("{} on the clock.", format_remaining(game.remaining_secs())).dimmed()
    );
    print_hands(&game);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let Some(line) = lines.next_line().await.map_err(|e| e.to_string())? else {
            break;
        };
        if game.is_expired() {
            println!("  {}", "Time is up!".yellow().bold());
            break;
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        let (cmd, rest) = input.split_once(' ').unwrap_or((input, ""));
        match cmd.to_lowercase().as_str() {
            "quit" | "q" => break,
            "help" => println!("{HELP}\n"),
            "hands" => print_hands(&game),
            "ask" => ask(&mut game, rest.trim()).await,
            "answer" => answer(&mut game, rest.trim()).await,
            "status" => status(&game).await,
            "transcript" => println!("{}", game.history().export_markdown()),
            other => println!("{}\n", format!("unknown command: {other}").yellow()),
        }
    }

    let summary = game.finish().await.map_err(|e| e.to_string())?;
    print_summary(&summary);
    if let Some(path) = transcript {
        fs::write(path, game.history().export_markdown())
            .map_err(|e| format!("cannot write {}: {e}", path.display()))?;
        println!("  Transcript saved to {}", path.display());
    }
    Ok(())
}

fn print_hands<S: DialogueService, T: Transcoder>(game: &Game<S, T>) {
    let raised: Vec<_> = game.crowd().raised().collect();
    if raised.is_empty() {
        println!("  {}\n", "No hands raised.".dimmed());
        return;
    }
    println!("  {}", "Raised hands".bold().underline());
    for (n, member) in raised.iter().enumerate() {
        if let Some(persona) = game.roster().get(member.persona_index) {
            println!("  {}. {persona}", n + 1);
        }
    }
    println!();
}

async fn ask<S: DialogueService, T: Transcoder>(game: &mut Game<S, T>, rest: &str) {
    let Ok(n) = rest.parse::<usize>() else {
        println!("{}\n", "usage: ask <n>".yellow());
        return;
    };
    let Some(id) = n
        .checked_sub(1)
        .and_then(|i| game.crowd().raised().nth(i))
        .map(|m| m.id)
    else {
        println!("{}\n", format!("no raised hand #{n}").yellow());
        return;
    };

    match game.call_on(id).await {
        Ok(question) => {
            let name = game
                .active_persona()
                .map(|p| p.to_string())
                .unwrap_or_default();
            println!("  {}: {}\n", name.cyan().bold(), question.transcript);
        }
        Err(e) => println!("{}\n", e.to_string().yellow()),
    }
}

async fn answer<S: DialogueService, T: Transcoder>(game: &mut Game<S, T>, rest: &str) {
    if rest.is_empty() {
        println!("{}\n", "usage: answer <file>".yellow());
        return;
    }
    let speaker = game.active_persona().map(|p| p.name.clone());
    let result = match load_recording(Path::new(rest)).await {
        Ok(audio) => game.answer(&audio).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(outcome) => {
            let score = format!("score {:+.2}", outcome.evaluation.score);
            let score = if outcome.evaluation.score >= 0.0 {
                score.green()
            } else {
                score.red()
            };
            let price = super::format_price(outcome.price.price, outcome.price.change_percent);
            println!("  {score}  price {price}");
            println!(
                "  {}: {}",
                speaker.unwrap_or_default().cyan().bold(),
                outcome.reply.transcript
            );
            if outcome.conversation_ended {
                println!("  {}", "The reporter sits down.".dimmed());
                println!();
                print_hands(game);
            } else {
                println!();
            }
        }
        Err(e) => println!("{}\n", e.to_string().yellow()),
    }
}

async fn status<S: DialogueService, T: Transcoder>(game: &Game<S, T>) {
    match game.snapshot().await {
        Ok(snap) => {
            println!(
                "  Price {}  trend {:+.2} ({} ticks left)",
                super::format_price(snap.price, snap.change_percent),
                snap.trend,
                snap.trend_remaining_steps
            );
        }
        Err(e) => println!("{}", e.to_string().yellow()),
    }
    println!("  Time left {}", format_remaining(game.remaining_secs()));
    match game.active_persona() {
        Some(persona) => println!("  At the microphone: {persona}\n"),
        None => println!("  Nobody at the microphone\n"),
    }
}

fn print_summary(summary: &GameSummary) {
    println!();
    println!("  {}", "Press conference over".bold().underline());
    println!(
        "  {} closed at {}",
        summary.company.company_name,
        super::format_price(summary.final_price, summary.change_percent)
    );
    println!(
        "  {} ticks, {} chat turns",
        summary.ticks, summary.turns
    );
    if summary.final_price == 0.0 {
        println!("  {}", "BANKRUPT".red().bold());
    }
}
