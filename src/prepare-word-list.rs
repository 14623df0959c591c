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

use std::process::ExitCode;
use std::collections::HashSet;
use std::io::{BufWriter, BufReader, BufRead, Write};
use std::fs::File;
use std::ffi::OsString;
use anyhow::Context;
use clap::Parser;
use letterfall::word_list;

#[derive(Parser)]
#[command(name = "prepare-word-list")]
struct Cli {
    #[arg(required = true, value_name = "INPUT")]
    inputs: Vec<OsString>,
    #[arg(short, long, value_name = "FILE")]
    output: OsString,
}

// Only the letters A to Z can ever appear on a tile
fn is_playable(word: &str) -> bool {
    word.chars().all(|ch| ch.is_ascii_uppercase())
}

fn read_words<R: BufRead>(
    reader: R,
    words: &mut HashSet<String>,
) -> Result<(), std::io::Error> {
    for line in reader.lines() {
        if let Some(word) = word_list::normalize(&line?) {
            if is_playable(&word) {
                words.insert(word);
            }
        }
    }

    Ok(())
}

fn write_words<W: Write>(
    mut output: W,
    words: HashSet<String>,
) -> Result<(), std::io::Error> {
    let mut words = words.into_iter().collect::<Vec<_>>();
    words.sort_unstable();

    for word in words.into_iter() {
        writeln!(&mut output, "{}", word)?;
    }

    output.flush()
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut words = HashSet::new();

    for input in cli.inputs.iter() {
        let name = input.to_string_lossy();

        let file = File::open(input).with_context(|| name.to_string())?;

        read_words(BufReader::new(file), &mut words)
            .with_context(|| name.to_string())?;
    }

    log::info!("writing {} words", words.len());

    let output = File::create(&cli.output)
        .with_context(|| cli.output.to_string_lossy().into_owned())?;

    write_words(BufWriter::new(output), words)
        .with_context(|| cli.output.to_string_lossy().into_owned())
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

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_is_playable() {
        assert!(is_playable("LETTERFALL"));
        assert!(!is_playable("DON’T"));
        assert!(!is_playable("CAFÉ"));
        assert!(!is_playable("NEW YORK"));
    }

    #[test]
    fn filtering() {
        let input = "# comment\n\
                     cat\n\
                     Dog\n\
                     \n\
                     at\n\
                     cat\n\
                     o'clock\n\
                     extraordinary\n";
        let mut words = HashSet::new();

        read_words(input.as_bytes(), &mut words).unwrap();

        let mut output = Vec::new();
        write_words(&mut output, words).unwrap();

        assert_eq!(String::from_utf8(output).unwrap(), "CAT\nDOG\n");
    }
}
