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
use anyhow::Context;
use clap::Parser;
use letterfall::finder::Finder;
use letterfall::grid::Grid;
use letterfall::word_list::WordList;

#[derive(Parser)]
#[command(name = "find-move")]
struct Cli {
    #[arg(short, long, value_name = "FILE")]
    dictionary: OsString,
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let word_list = WordList::load(&cli.dictionary)?;

    let grid_string = std::io::read_to_string(std::io::stdin())
        .context("stdin")?;
    let grid = Grid::new(&grid_string).context("stdin")?;

    let mut finder = Finder::new();

    match finder.find(&grid, word_list.dictionary()) {
        Some(route) => {
            let path = route.iter()
                .map(|pos| pos.to_string())
                .collect::<Vec<_>>()
                .join(" ");

            println!("{} {}", grid.word_for(route), path);
        },
        None => println!("deadlock"),
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
