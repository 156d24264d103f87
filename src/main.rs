//! wordgrid - word-grid puzzle rules engine
//!
//! Check words, encode word lists, or watch a greedy player work the board.

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use wordgrid::demo::{self, Autoplay};
use wordgrid::game::dictionary::encode;
use wordgrid::game::WILDCARD;
use wordgrid::{Dictionary, Settings};

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let mut settings = match &cli.config {
        Some(path) => Settings::load_from(path)?.with_env_overrides(|key| std::env::var_os(key)),
        None => Settings::load()?,
    };
    if let Some(words) = cli.words {
        settings.words_path = Some(words);
    }

    match cli.command {
        Command::Check { words } => check(&settings, &words),
        Command::Encode => encode_stdin(),
        Command::Stats => stats(&settings),
        Command::Demo {
            opening,
            plays,
            seed,
        } => run_demo(&settings, &opening, plays, seed),
    }
}

fn load_dictionary(settings: &Settings) -> Result<Dictionary> {
    let dictionary = settings.dictionary()?;
    dictionary.ensure_loaded()?;
    Ok(dictionary)
}

/// Exits with failure if any word is missing.
fn check(settings: &Settings, words: &[String]) -> Result<ExitCode> {
    let dictionary = load_dictionary(settings)?;
    let mut stdout = io::stdout().lock();
    let mut all_found = true;
    for word in words {
        match dictionary.find_word(word) {
            Some(found) if word.contains(WILDCARD) => writeln!(stdout, "{word}\tok\t{found}")?,
            Some(_) => writeln!(stdout, "{word}\tok")?,
            None => {
                all_found = false;
                writeln!(stdout, "{word}\tno")?;
            }
        }
    }
    Ok(if all_found {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn encode_stdin() -> Result<ExitCode> {
    let words = io::stdin().lock().lines().collect::<io::Result<Vec<String>>>()?;
    let encoded = encode(&words);
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{encoded}")?;
    info!(lines = words.len(), bytes = encoded.len(), "encoded word list");
    Ok(ExitCode::SUCCESS)
}

fn stats(settings: &Settings) -> Result<ExitCode> {
    let dictionary = load_dictionary(settings)?;
    println!("{} words", dictionary.len());
    Ok(ExitCode::SUCCESS)
}

fn run_demo(
    settings: &Settings,
    opening: &str,
    plays: usize,
    seed: Option<u64>,
) -> Result<ExitCode> {
    let seed = seed.unwrap_or_else(rand::random);
    let dictionary = Arc::new(load_dictionary(settings)?);
    let mut session =
        settings.new_session_with_rng(dictionary, &mut StdRng::seed_from_u64(seed))?;
    let mut rules = Autoplay::new(opening, plays);
    let made = demo::run(&mut session, &mut rules)?;

    println!("seed {seed}");
    for (turn, words) in rules.plays().iter().enumerate() {
        println!("{:>3}. {words}", turn + 1);
    }
    println!("{made} plays, {} tiles left in the bag", session.bag().remain());
    println!("rack: {}", session.rack().as_string());
    print!("{}", demo::render(&session));
    Ok(ExitCode::SUCCESS)
}
