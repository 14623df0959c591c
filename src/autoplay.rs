// Letterfall – A word game
// Copyright (C) 2024  Neil Roberts
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

use std::{process::ExitCode, ffi::OsString};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use anyhow::{anyhow, Context};
use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};
use letterfall::game::{Event, Game, Phase};
use letterfall::grid::{Grid, Position};
use letterfall::leaderboard::{JsonFileStore, Leaderboard, LeaderboardStore};
use letterfall::session::{Difficulty, Mode};
use letterfall::tile::TileColor;
use letterfall::word_list::WordList;

// Granularity used to let the board settle after a move
const SETTLE_STEP: Duration = Duration::from_millis(50);
// Give up on a game that stops making progress
const MAX_STALLS: u32 = 10_000;

#[derive(Parser)]
#[command(name = "autoplay")]
struct Cli {
    #[arg(short, long, value_name = "FILE")]
    dictionary: OsString,
    #[arg(short, long, value_name = "MODE", default_value = "casual")]
    mode: Mode,
    #[arg(long, value_name = "LEVEL", default_value = "normal")]
    difficulty: Difficulty,
    #[arg(short, long, value_name = "SEED")]
    seed: Option<u64>,
    #[arg(short, long, value_name = "COUNT", default_value_t = 1)]
    games: u32,
    #[arg(long, value_name = "COUNT", default_value_t = 200)]
    max_moves: u32,
    #[arg(long, value_name = "MS", default_value_t = 1000)]
    think_time: u64,
    #[arg(short, long, value_name = "FILE")]
    leaderboard: Option<OsString>,
    #[arg(short = 'H', long)]
    human_readable: bool,
    #[arg(long)]
    json: bool,
}

fn print_grid(grid: &Grid) {
    for row in 0..grid.size() {
        for col in 0..grid.size() {
            let tile = grid.at(Position::new(row, col));

            let marker = match tile.color() {
                Some(TileColor::Wild) => '*',
                Some(TileColor::Bomb) => '!',
                _ => ' ',
            };

            print!(" {}{}", tile.letter().unwrap_or('#'), marker);
        }

        println!();
    }
}

fn timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn make_move(
    game: &mut Game<StdRng>,
    route: &[Position],
) -> anyhow::Result<()> {
    let Some((&first, rest)) = route.split_first()
    else {
        return Err(anyhow!("empty route"));
    };

    game.select(first)
        .map_err(|e| anyhow!("{}: selection rejected: {:?}", first, e))?;

    for &pos in rest {
        game.move_selection(pos)
            .map_err(|e| anyhow!("{}: move rejected: {:?}", pos, e))?;
    }

    game.release_selection()
        .map_err(|e| anyhow!("release rejected: {:?}", e))
}

fn settle(game: &mut Game<StdRng>) {
    while game.is_animating() && game.phase() == Phase::Playing {
        game.advance(SETTLE_STEP);
    }
}

fn play(game: &mut Game<StdRng>, cli: &Cli) -> anyhow::Result<u32> {
    let think_time = Duration::from_millis(cli.think_time);
    let mut moves = 0;
    let mut stalls = 0;

    while moves < cli.max_moves && stalls < MAX_STALLS {
        match game.phase() {
            Phase::Playing => (),
            Phase::LevelComplete => {
                game.advance_level()?;

                if let Some(session) = game.session() {
                    log::info!("bot reached level {}", session.level);
                }

                continue;
            },
            _ => break,
        }

        game.advance(think_time);

        if game.phase() != Phase::Playing {
            continue;
        }

        let Some(route) = game.hint()?
        else {
            // Nothing to do but wait for the clock or the deadlock check
            stalls += 1;
            continue;
        };

        if cli.human_readable {
            if let Some(grid) = game.grid() {
                println!();
                print_grid(grid);
                println!("{}", grid.word_for(&route));
            }
        }

        make_move(game, &route)?;
        moves += 1;

        for event in game.take_events() {
            if let Event::WordMatched(outcome) = event {
                log::debug!(
                    "bot scored {} with {}",
                    outcome.total,
                    outcome.word,
                );
            }
        }

        if cli.human_readable {
            if let Some(feedback) = game.feedback() {
                println!("{}", feedback.text);
            }
        }

        settle(game);
    }

    Ok(moves)
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let word_list = WordList::load(&cli.dictionary)?;

    let seed = cli.seed.unwrap_or_else(rand::random);
    log::info!("using seed {}", seed);

    let mut game = Game::with_word_list(word_list, StdRng::seed_from_u64(seed));

    let store = cli.leaderboard.as_ref().map(JsonFileStore::new);
    let mut leaderboard = match store.as_ref() {
        Some(store) => store.load()?,
        None => Leaderboard::new(),
    };

    for game_num in 1..=cli.games {
        game.start(cli.mode, cli.difficulty)?;

        let moves = play(&mut game, cli)?;
        game.take_events();

        if cli.json {
            println!("{}", serde_json::to_string(&game.snapshot())?);
        }

        let session = game.session()
            .context("game has no session")?;

        let outcome = match game.phase() {
            Phase::GameOver(reason) => format!("{:?}", reason),
            _ => "stopped".to_string(),
        };

        println!(
            "game {}: {} after {} moves, score {}, {} words, \
             level {}, best word {}",
            game_num,
            outcome,
            moves,
            session.score,
            session.word_count,
            session.level,
            if session.best_word.is_empty() {
                "-"
            } else {
                session.best_word.as_str()
            },
        );

        if let Some(store) = store.as_ref() {
            let entry = session.leaderboard_entry(timestamp());

            if leaderboard.save(cli.mode, entry) {
                println!("new {} high score", cli.mode);
            }

            store.store(&leaderboard)?;
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("{:#}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
