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

use std::time::Duration;
use serde::Serialize;
use super::config::{
    COUNTDOWN_PERIOD, DEADLOCK_CHECK_DELAY, INVALID_FLASH_DELAY,
    MATCH_SETTLE_DELAY, REFILL_SETTLE_DELAY,
};
use super::finder::Finder;
use super::grid::{Grid, Position};
use super::refill::{
    self, RandomSource, RefillReport, SpawnQueue, TileGenerator,
};
use super::resolver::{self, Bonus, MatchOutcome};
use super::scheduler::Scheduler;
use super::selection::{Rejection, Selection, Step};
use super::session::{Difficulty, Mode, Session};
use super::tile::TileStatus;
use super::word_list::{self, WordList};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOverReason {
    TimeUp,
    Deadlock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    AwaitingDictionary,
    DictionaryFailed,
    Ready,
    Playing,
    LevelComplete,
    GameOver(GameOverReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKind {
    Invalid,
    Word,
    Color,
    Gold,
    Explosion,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackMessage {
    pub text: String,
    pub kind: FeedbackKind,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    SelectionRejected { reason: Rejection },
    InvalidWord { word: String },
    WordMatched(MatchOutcome),
    Refilled(RefillReport),
    LevelComplete { level: u32 },
    GameOver { reason: GameOverReason },
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("the word list hasn’t been loaded yet")]
    DictionaryNotLoaded,
    #[error("the word list couldn’t be loaded")]
    DictionaryUnavailable,
    #[error("no game has been started")]
    NotStarted,
    #[error("not possible while the game is in the {0:?} phase")]
    WrongPhase(Phase),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    ClearInvalid,
    Settle,
    RefillComplete,
    DeadlockCheck,
    CountdownTick,
}

// Everything that is replaced when a new game starts
#[derive(Debug, Clone)]
struct Round {
    grid: Grid,
    session: Session,
    spawn_queue: SpawnQueue,
    selection: Selection,
}

#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<'a> {
    pub phase: Phase,
    pub animating: bool,
    pub session: Option<&'a Session>,
    pub grid: Option<&'a Grid>,
    pub feedback: Option<&'a FeedbackMessage>,
}

pub struct Game<R> {
    word_list: Option<WordList>,
    load_error: Option<word_list::Error>,
    phase: Phase,
    rng: R,
    generator: TileGenerator,
    finder: Finder,
    scheduler: Scheduler<Transition>,
    round: Option<Round>,
    animating: bool,
    feedback: Option<FeedbackMessage>,
    events: Vec<Event>,
}

fn feedback_for(outcome: &MatchOutcome) -> FeedbackMessage {
    let (prefix, kind) = match outcome.bonus {
        Some(Bonus::Gold) => ("GOLD! ", FeedbackKind::Gold),
        Some(Bonus::Color) => ("COLOR! ", FeedbackKind::Color),
        None if !outcome.exploded.is_empty() => {
            ("BOOM! ", FeedbackKind::Explosion)
        },
        None => ("", FeedbackKind::Word),
    };

    FeedbackMessage {
        text: format!("{}+{}", prefix, outcome.total),
        kind,
    }
}

// Shows the live classification of the selection on its tiles
fn paint_selection(
    grid: &mut Grid,
    selection: &Selection,
    word_list: &WordList,
) {
    let status = selection.feedback(word_list.dictionary()).tile_status();

    for &pos in selection.path() {
        grid.at_mut(pos).status = status;
    }
}

fn clear_selection(grid: &mut Grid, selection: &mut Selection) {
    for &pos in selection.path() {
        let tile = grid.at_mut(pos);

        if !tile.is_removed() {
            tile.status = TileStatus::Idle;
        }
    }

    selection.clear();
}

impl<R: RandomSource> Game<R> {
    pub fn new(rng: R) -> Game<R> {
        Game {
            word_list: None,
            load_error: None,
            phase: Phase::AwaitingDictionary,
            rng,
            generator: TileGenerator::new(),
            finder: Finder::new(),
            scheduler: Scheduler::new(),
            round: None,
            animating: false,
            feedback: None,
            events: Vec::new(),
        }
    }

    pub fn with_word_list(word_list: WordList, rng: R) -> Game<R> {
        let mut game = Game::new(rng);
        game.dictionary_loaded(Ok(word_list));
        game
    }

    pub fn dictionary_loaded(
        &mut self,
        result: Result<WordList, word_list::Error>,
    ) {
        if self.phase != Phase::AwaitingDictionary {
            log::warn!(
                "ignoring word list delivered in {:?} phase",
                self.phase,
            );
            return;
        }

        match result {
            Ok(word_list) => {
                log::debug!("word list ready with {} words", word_list.len());
                self.word_list = Some(word_list);
                self.phase = Phase::Ready;
            },
            Err(e) => {
                log::warn!("word list failed to load: {}", e);
                self.load_error = Some(e);
                self.phase = Phase::DictionaryFailed;
            },
        }
    }

    fn check_dictionary(&self) -> Result<(), GameError> {
        match self.phase {
            Phase::AwaitingDictionary => Err(GameError::DictionaryNotLoaded),
            Phase::DictionaryFailed => Err(GameError::DictionaryUnavailable),
            _ => Ok(()),
        }
    }

    pub fn start(
        &mut self,
        mode: Mode,
        difficulty: Difficulty,
    ) -> Result<(), GameError> {
        self.check_dictionary()?;

        self.scheduler.cancel_all();
        self.animating = false;
        self.feedback = None;

        let grid = self.generator.fill_grid(&mut self.rng, mode);

        self.round = Some(Round {
            grid,
            session: Session::new(mode, difficulty),
            spawn_queue: SpawnQueue::new(),
            selection: Selection::new(),
        });

        self.phase = Phase::Playing;

        log::info!("started a {} game on {} difficulty", mode, difficulty);

        self.start_clock(mode);

        Ok(())
    }

    // Either the countdown or a check that the board still has a move
    fn start_clock(&mut self, mode: Mode) {
        match mode {
            Mode::Timed => {
                self.scheduler.schedule_repeating(
                    COUNTDOWN_PERIOD,
                    Transition::CountdownTick,
                );
            },
            Mode::Casual => {
                self.scheduler.schedule_once(
                    DEADLOCK_CHECK_DELAY,
                    Transition::DeadlockCheck,
                );
            },
        }
    }

    fn accepts_input(&self) -> bool {
        self.phase == Phase::Playing && !self.animating
    }

    fn reject<T>(&mut self, reason: Rejection) -> Result<T, Rejection> {
        self.events.push(Event::SelectionRejected { reason });
        Err(reason)
    }

    pub fn select(&mut self, pos: Position) -> Result<(), Rejection> {
        if !self.accepts_input() {
            return self.reject(Rejection::Busy);
        }

        let (Some(round), Some(word_list)) =
            (self.round.as_mut(), self.word_list.as_ref())
        else {
            return self.reject(Rejection::Busy);
        };

        clear_selection(&mut round.grid, &mut round.selection);

        if let Err(reason) = round.selection.begin(&round.grid, pos) {
            return self.reject(reason);
        }

        paint_selection(&mut round.grid, &round.selection, word_list);

        Ok(())
    }

    pub fn move_selection(&mut self, pos: Position) -> Result<Step, Rejection> {
        if !self.accepts_input() {
            return self.reject(Rejection::Busy);
        }

        let (Some(round), Some(word_list)) =
            (self.round.as_mut(), self.word_list.as_ref())
        else {
            return self.reject(Rejection::Busy);
        };

        let tail = round.selection.path().last().copied();

        let step = match round.selection.extend(&round.grid, pos) {
            Ok(step) => step,
            Err(reason) => return self.reject(reason),
        };

        if step == Step::Backtracked {
            if let Some(tail) = tail {
                round.grid.at_mut(tail).status = TileStatus::Idle;
            }
        }

        paint_selection(&mut round.grid, &round.selection, word_list);

        Ok(step)
    }

    pub fn release_selection(&mut self) -> Result<(), Rejection> {
        if !self.accepts_input() {
            return self.reject(Rejection::Busy);
        }

        let (Some(round), Some(word_list)) =
            (self.round.as_mut(), self.word_list.as_ref())
        else {
            return self.reject(Rejection::Busy);
        };

        if round.selection.is_empty() {
            return self.reject(Rejection::NoSelection);
        }

        // The board is about to change or flash so a pending check
        // would run too early. It is scheduled again once the board
        // settles.
        self.scheduler.cancel_event(&Transition::DeadlockCheck);

        if !round.selection.is_submittable(word_list) {
            for &pos in round.selection.path() {
                round.grid.at_mut(pos).status = TileStatus::InvalidSubmission;
            }

            let word = round.selection.word().to_string();
            round.selection.clear();

            log::debug!("rejected submission {}", word);

            self.feedback = Some(FeedbackMessage {
                text: "NOT A WORD".to_string(),
                kind: FeedbackKind::Invalid,
            });
            self.events.push(Event::InvalidWord { word });
            self.animating = true;
            self.scheduler.schedule_once(
                INVALID_FLASH_DELAY,
                Transition::ClearInvalid,
            );

            return Ok(());
        }

        let session = &mut round.session;

        let outcome = resolver::resolve(
            &round.grid,
            round.selection.path(),
            &mut session.streaks,
            session.difficulty,
            session.mode,
            session.level,
        );

        resolver::mark_removed(&mut round.grid, &outcome);
        session.record_match(&outcome);

        if let Some(special) = outcome.spawned {
            round.spawn_queue.push(special);
        }

        round.selection.clear();

        self.feedback = Some(feedback_for(&outcome));
        self.events.push(Event::WordMatched(outcome));
        self.animating = true;
        self.scheduler.schedule_once(MATCH_SETTLE_DELAY, Transition::Settle);

        Ok(())
    }

    pub fn advance_level(&mut self) -> Result<(), GameError> {
        self.check_dictionary()?;

        if self.phase != Phase::LevelComplete {
            return Err(GameError::WrongPhase(self.phase));
        }

        let Some(round) = self.round.as_mut()
        else {
            return Err(GameError::NotStarted);
        };

        round.session.advance_level();
        let mode = round.session.mode;

        log::info!("advanced to level {}", round.session.level);

        self.phase = Phase::Playing;
        self.animating = false;
        self.feedback = None;

        self.start_clock(mode);

        Ok(())
    }

    // Returns the route of a word that can currently be made, if any
    pub fn hint(&mut self) -> Result<Option<Vec<Position>>, GameError> {
        self.check_dictionary()?;

        let (Some(round), Some(word_list)) =
            (self.round.as_ref(), self.word_list.as_ref())
        else {
            return Err(GameError::NotStarted);
        };

        let route = self.finder.find(&round.grid, word_list.dictionary());

        Ok(route.map(|route| route.to_vec()))
    }

    // Moves the virtual clock forward and runs everything that falls
    // due. Anything scheduled while doing that also runs if it falls
    // due before the end of the step.
    pub fn advance(&mut self, dt: Duration) {
        let until = self.scheduler.now() + dt;

        while let Some(transition) = self.scheduler.pop_due(until) {
            self.fire(transition);
        }

        self.scheduler.advance_to(until);
    }

    fn fire(&mut self, transition: Transition) {
        if self.phase != Phase::Playing {
            return;
        }

        let Some(round) = self.round.as_mut()
        else {
            return;
        };

        match transition {
            Transition::ClearInvalid => {
                for tile in round.grid.tiles_mut() {
                    if tile.status == TileStatus::InvalidSubmission {
                        tile.status = TileStatus::Idle;
                    }
                }

                self.feedback = None;
                self.animating = false;

                if round.session.mode == Mode::Casual {
                    self.scheduler.schedule_once(
                        DEADLOCK_CHECK_DELAY,
                        Transition::DeadlockCheck,
                    );
                }
            },
            Transition::Settle => {
                let report = refill::refill(
                    &mut round.grid,
                    &mut self.generator,
                    &mut self.rng,
                    &mut round.spawn_queue,
                    round.session.level,
                    round.session.mode,
                );

                self.events.push(Event::Refilled(report));

                if round.session.level_reached() {
                    let level = round.session.level;

                    log::info!(
                        "level {} complete with {} points",
                        level,
                        round.session.score,
                    );

                    self.scheduler.cancel_event(&Transition::CountdownTick);
                    self.phase = Phase::LevelComplete;
                    self.animating = false;
                    self.events.push(Event::LevelComplete { level });
                } else {
                    self.scheduler.schedule_once(
                        REFILL_SETTLE_DELAY,
                        Transition::RefillComplete,
                    );
                }
            },
            Transition::RefillComplete => {
                self.feedback = None;

                match round.session.mode {
                    // Input stays blocked until the check has run
                    Mode::Casual => {
                        self.scheduler.schedule_once(
                            DEADLOCK_CHECK_DELAY,
                            Transition::DeadlockCheck,
                        );
                    },
                    Mode::Timed => self.animating = false,
                }
            },
            Transition::DeadlockCheck => {
                self.animating = false;

                let Some(word_list) = self.word_list.as_ref()
                else {
                    return;
                };

                let found = self.finder.find(
                    &round.grid,
                    word_list.dictionary(),
                ).is_some();

                log::debug!("deadlock check found a move: {}", found);

                if !found {
                    self.game_over(GameOverReason::Deadlock);
                }
            },
            Transition::CountdownTick => {
                if round.session.tick() {
                    self.game_over(GameOverReason::TimeUp);
                }
            },
        }
    }

    fn game_over(&mut self, reason: GameOverReason) {
        self.scheduler.cancel_all();
        self.animating = false;
        self.phase = Phase::GameOver(reason);

        if let Some(round) = self.round.as_mut() {
            clear_selection(&mut round.grid, &mut round.selection);

            log::info!(
                "game over ({:?}) with {} points from {} words",
                reason,
                round.session.score,
                round.session.word_count,
            );
        }

        self.events.push(Event::GameOver { reason });
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn grid(&self) -> Option<&Grid> {
        self.round.as_ref().map(|round| &round.grid)
    }

    pub fn session(&self) -> Option<&Session> {
        self.round.as_ref().map(|round| &round.session)
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.round.as_ref().map(|round| &round.selection)
    }

    pub fn spawn_queue(&self) -> Option<&SpawnQueue> {
        self.round.as_ref().map(|round| &round.spawn_queue)
    }

    pub fn feedback(&self) -> Option<&FeedbackMessage> {
        self.feedback.as_ref()
    }

    pub fn word_list(&self) -> Option<&WordList> {
        self.word_list.as_ref()
    }

    pub fn load_error(&self) -> Option<&word_list::Error> {
        self.load_error.as_ref()
    }

    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            phase: self.phase,
            animating: self.animating,
            session: self.session(),
            grid: self.grid(),
            feedback: self.feedback(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use super::super::refill::test::ScriptedRandom;

    fn p(row: u32, col: u32) -> Position {
        Position::new(row, col)
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    // The scripted random source fills the board with red A tiles
    fn make_game(words: &[&str]) -> Game<ScriptedRandom> {
        Game::with_word_list(
            WordList::from_words(words.iter()),
            ScriptedRandom::plain(),
        )
    }

    fn trace(game: &mut Game<ScriptedRandom>, path: &[Position]) {
        game.select(path[0]).unwrap();

        for &pos in &path[1..] {
            assert_eq!(game.move_selection(pos), Ok(Step::Appended));
        }
    }

    fn status(game: &Game<ScriptedRandom>, pos: Position) -> TileStatus {
        game.grid().unwrap().at(pos).status
    }

    #[test]
    fn dictionary_states() {
        let mut game = Game::new(ScriptedRandom::plain());

        assert_eq!(game.phase(), Phase::AwaitingDictionary);
        assert_eq!(
            game.start(Mode::Casual, Difficulty::Easy),
            Err(GameError::DictionaryNotLoaded),
        );
        assert_eq!(game.select(p(0, 0)), Err(Rejection::Busy));

        game.dictionary_loaded(Err(word_list::Error::Empty));
        assert_eq!(game.phase(), Phase::DictionaryFailed);
        assert!(game.load_error().is_some());
        assert_eq!(
            game.start(Mode::Casual, Difficulty::Easy),
            Err(GameError::DictionaryUnavailable),
        );
        assert_eq!(game.hint(), Err(GameError::DictionaryUnavailable));
        assert_eq!(
            game.advance_level(),
            Err(GameError::DictionaryUnavailable),
        );

        // A late word list doesn’t revive the game
        game.dictionary_loaded(Ok(WordList::from_words(["AAA"])));
        assert_eq!(game.phase(), Phase::DictionaryFailed);
        assert!(game.grid().is_none());
    }

    #[test]
    fn start() {
        let mut game = make_game(&["AAA"]);

        assert_eq!(game.phase(), Phase::Ready);
        assert_eq!(game.hint(), Err(GameError::NotStarted));

        game.start(Mode::Casual, Difficulty::Easy).unwrap();

        assert_eq!(game.phase(), Phase::Playing);
        assert!(!game.is_animating());

        let grid = game.grid().unwrap();
        assert!(grid.tiles().all(|(_, tile)| {
            tile.status == TileStatus::Idle && !tile.is_new
        }));

        let session = game.session().unwrap();
        assert_eq!(session.level, 1);
        assert_eq!(session.score, 0);
        assert!(game.spawn_queue().unwrap().is_empty());
    }

    #[test]
    fn match_chain() {
        let mut game = make_game(&["AAA"]);
        game.start(Mode::Casual, Difficulty::Easy).unwrap();

        let path = [p(5, 0), p(5, 1), p(5, 2)];
        trace(&mut game, &path);
        assert_eq!(status(&game, p(5, 2)), TileStatus::ValidPath);

        game.release_selection().unwrap();

        let events = game.take_events();
        let [Event::WordMatched(outcome)] = &events[..]
        else {
            panic!("unexpected events {:?}", events);
        };
        assert_eq!(&outcome.word, "AAA");
        assert_eq!(outcome.bonus, Some(Bonus::Color));
        assert_eq!(outcome.total, 20);

        assert_eq!(game.session().unwrap().score, 20);
        assert_eq!(
            game.feedback(),
            Some(&FeedbackMessage {
                text: "COLOR! +20".to_string(),
                kind: FeedbackKind::Color,
            }),
        );
        assert!(game.is_animating());
        assert!(path.iter().all(|&pos| status(&game, pos) == TileStatus::Matched));

        // Input is refused while the board settles
        assert_eq!(game.select(p(0, 0)), Err(Rejection::Busy));
        let events = game.take_events();
        assert!(matches!(
            &events[..],
            [Event::SelectionRejected { reason: Rejection::Busy }],
        ));

        game.advance(ms(299));
        assert!(game.grid().unwrap().at(path[0]).is_removed());

        game.advance(ms(1));
        let events = game.take_events();
        assert!(matches!(
            &events[..],
            [Event::Refilled(RefillReport { generated: 3, forced: 0 })],
        ));

        let grid = game.grid().unwrap();
        for col in 0..3 {
            assert!(grid.at(p(0, col)).is_new);
            assert!(!grid.at(p(5, col)).is_removed());
        }
        assert!(game.is_animating());
        assert!(game.feedback().is_some());

        game.advance(ms(250));
        assert!(game.feedback().is_none());
        // Still blocked until the deadlock check has run
        assert!(game.is_animating());

        game.advance(ms(499));
        assert!(game.is_animating());
        game.advance(ms(1));
        assert!(!game.is_animating());
        assert_eq!(game.phase(), Phase::Playing);

        game.select(p(0, 0)).unwrap();
    }

    #[test]
    fn invalid_word() {
        let mut game = make_game(&["CAT"]);
        game.start(Mode::Timed, Difficulty::Normal).unwrap();

        let path = [p(0, 0), p(0, 1), p(0, 2)];
        trace(&mut game, &path);
        // Nothing in the word list starts with A
        assert_eq!(status(&game, p(0, 0)), TileStatus::RejectedPrefix);

        game.release_selection().unwrap();

        let events = game.take_events();
        let [Event::InvalidWord { word }] = &events[..]
        else {
            panic!("unexpected events {:?}", events);
        };
        assert_eq!(word, "AAA");

        assert!(path.iter().all(|&pos| {
            status(&game, pos) == TileStatus::InvalidSubmission
        }));
        assert_eq!(game.feedback().map(|f| f.kind), Some(FeedbackKind::Invalid));
        assert!(game.is_animating());
        assert!(game.selection().unwrap().is_empty());
        assert_eq!(game.move_selection(p(1, 1)), Err(Rejection::Busy));

        game.advance(ms(400));

        assert!(path.iter().all(|&pos| status(&game, pos) == TileStatus::Idle));
        assert!(!game.is_animating());
        assert!(game.feedback().is_none());
        assert_eq!(game.session().unwrap().score, 0);

        // A single tile is too short to be a word
        game.take_events();
        game.select(p(3, 3)).unwrap();
        game.release_selection().unwrap();
        assert!(matches!(&game.take_events()[..], [Event::InvalidWord { .. }]));
    }

    #[test]
    fn release_without_selection() {
        let mut game = make_game(&["AAA"]);
        game.start(Mode::Timed, Difficulty::Normal).unwrap();

        assert_eq!(game.release_selection(), Err(Rejection::NoSelection));
        assert!(!game.is_animating());
    }

    #[test]
    fn backtrack_resets_tiles() {
        let mut game = make_game(&["AAA"]);
        game.start(Mode::Timed, Difficulty::Easy).unwrap();

        trace(&mut game, &[p(0, 0), p(0, 1), p(0, 2)]);

        assert_eq!(game.move_selection(p(0, 1)), Ok(Step::Backtracked));
        assert_eq!(status(&game, p(0, 2)), TileStatus::Idle);
        assert_eq!(status(&game, p(0, 1)), TileStatus::Selected);

        assert_eq!(game.move_selection(p(3, 3)), Err(Rejection::NotAdjacent));
        assert!(matches!(
            &game.take_events()[..],
            [Event::SelectionRejected { reason: Rejection::NotAdjacent }],
        ));

        // Starting again abandons the old path
        game.select(p(4, 4)).unwrap();
        assert_eq!(status(&game, p(0, 0)), TileStatus::Idle);
        assert_eq!(status(&game, p(0, 1)), TileStatus::Idle);
        assert_eq!(status(&game, p(4, 4)), TileStatus::Selected);
    }

    #[test]
    fn deadlock_at_start() {
        let mut game = make_game(&["CAT"]);
        game.start(Mode::Casual, Difficulty::Normal).unwrap();

        game.advance(ms(499));
        assert_eq!(game.phase(), Phase::Playing);

        game.advance(ms(1));
        assert_eq!(game.phase(), Phase::GameOver(GameOverReason::Deadlock));
        assert!(matches!(
            &game.take_events()[..],
            [Event::GameOver { reason: GameOverReason::Deadlock }],
        ));
        assert_eq!(game.hint(), Ok(None));
        assert_eq!(game.scheduler.pending(), 0);
    }

    #[test]
    fn deadlock_check_after_invalid_flash() {
        let mut game = make_game(&["CAT"]);
        game.start(Mode::Casual, Difficulty::Normal).unwrap();

        // The release cancels the check from the start of the game
        game.select(p(3, 3)).unwrap();
        game.release_selection().unwrap();
        assert!(!game.scheduler.is_scheduled(&Transition::DeadlockCheck));

        game.advance(ms(400));
        assert!(!game.is_animating());
        assert_eq!(game.phase(), Phase::Playing);

        // It comes back once the flash is over
        game.advance(ms(499));
        assert_eq!(game.phase(), Phase::Playing);

        game.advance(ms(1));
        assert_eq!(game.phase(), Phase::GameOver(GameOverReason::Deadlock));
    }

    #[test]
    fn deadlock_after_refill() {
        let mut game = make_game(&["CAT"]);
        game.start(Mode::Casual, Difficulty::Normal).unwrap();

        game.round.as_mut().unwrap().grid = Grid::new(
            "X X X X X X\n\
             X X X X X X\n\
             X X X X X X\n\
             X X X X X X\n\
             X X X X X X\n\
             C A T X X X"
        ).unwrap();

        assert_eq!(
            game.hint(),
            Ok(Some(vec![p(5, 0), p(5, 1), p(5, 2)])),
        );

        trace(&mut game, &[p(5, 0), p(5, 1), p(5, 2)]);
        game.release_selection().unwrap();
        assert_eq!(
            game.feedback(),
            Some(&FeedbackMessage {
                text: "+10".to_string(),
                kind: FeedbackKind::Word,
            }),
        );

        // The check from the start of the game was cancelled by the
        // match so nothing happens until the board has settled
        game.advance(ms(1049));
        assert_eq!(game.phase(), Phase::Playing);
        assert!(game.is_animating());

        game.advance(ms(1));
        assert_eq!(game.phase(), Phase::GameOver(GameOverReason::Deadlock));
        assert!(!game.is_animating());
        assert_eq!(game.session().unwrap().score, 10);
    }

    #[test]
    fn level_complete() {
        let mut game = make_game(&["AAA"]);
        game.start(Mode::Casual, Difficulty::Easy).unwrap();
        game.round.as_mut().unwrap().session.score = 480;

        trace(&mut game, &[p(5, 0), p(5, 1), p(5, 2)]);
        game.release_selection().unwrap();
        game.take_events();

        game.advance(ms(300));
        assert_eq!(game.phase(), Phase::LevelComplete);
        assert!(!game.is_animating());

        let events = game.take_events();
        assert!(matches!(
            &events[..],
            [Event::Refilled(_), Event::LevelComplete { level: 1 }],
        ));

        assert_eq!(game.select(p(0, 0)), Err(Rejection::Busy));

        let ids = game.grid().unwrap()
            .tiles()
            .map(|(_, tile)| tile.id)
            .collect::<Vec<_>>();

        game.advance_level().unwrap();

        assert_eq!(game.phase(), Phase::Playing);
        let session = game.session().unwrap();
        assert_eq!(session.level, 2);
        assert_eq!(session.target_score, 1500);
        assert_eq!(session.score, 500);

        // The board carries over to the next level
        assert!(game.grid().unwrap().tiles().map(|(_, tile)| tile.id).eq(ids));

        assert_eq!(
            game.advance_level(),
            Err(GameError::WrongPhase(Phase::Playing)),
        );
    }

    #[test]
    fn level_complete_pauses_countdown() {
        let mut game = make_game(&["AAA"]);
        game.start(Mode::Timed, Difficulty::Easy).unwrap();
        game.round.as_mut().unwrap().session.score = 480;

        trace(&mut game, &[p(5, 0), p(5, 1), p(5, 2)]);
        game.release_selection().unwrap();
        // Three seconds for the letters and two for the color bonus
        assert_eq!(game.session().unwrap().time_left, 65);

        game.advance(ms(300));
        assert_eq!(game.phase(), Phase::LevelComplete);

        game.advance(Duration::from_secs(5));
        assert_eq!(game.session().unwrap().time_left, 65);

        game.advance_level().unwrap();
        game.advance(Duration::from_secs(1));
        assert_eq!(game.session().unwrap().time_left, 64);
    }

    #[test]
    fn time_up() {
        let mut game = make_game(&["AAA"]);
        game.start(Mode::Timed, Difficulty::Normal).unwrap();
        game.round.as_mut().unwrap().session.time_left = 2;

        trace(&mut game, &[p(0, 0), p(0, 1)]);

        game.advance(Duration::from_secs(1));
        assert_eq!(game.session().unwrap().time_left, 1);
        assert_eq!(game.phase(), Phase::Playing);

        game.advance(Duration::from_secs(1));
        assert_eq!(game.phase(), Phase::GameOver(GameOverReason::TimeUp));
        assert!(matches!(
            &game.take_events()[..],
            [Event::GameOver { reason: GameOverReason::TimeUp }],
        ));

        // The selection in progress is thrown away
        assert!(game.selection().unwrap().is_empty());
        assert_eq!(status(&game, p(0, 0)), TileStatus::Idle);
        assert_eq!(status(&game, p(0, 1)), TileStatus::Idle);
        assert_eq!(game.scheduler.pending(), 0);
        assert_eq!(game.release_selection(), Err(Rejection::Busy));

        game.take_events();
        game.advance(Duration::from_secs(5));
        assert_eq!(game.session().unwrap().time_left, 0);
        assert!(game.take_events().is_empty());
    }

    #[test]
    fn restart_cancels_timers() {
        let mut game = make_game(&["AAA"]);

        game.start(Mode::Timed, Difficulty::Normal).unwrap();
        trace(&mut game, &[p(5, 0), p(5, 1), p(5, 2)]);
        game.release_selection().unwrap();
        assert!(game.is_animating());

        // Starting again in the same mode doesn’t add a second countdown
        game.start(Mode::Timed, Difficulty::Normal).unwrap();
        assert!(!game.is_animating());
        assert_eq!(game.scheduler.pending(), 1);
        assert!(game.scheduler.is_scheduled(&Transition::CountdownTick));

        game.start(Mode::Casual, Difficulty::Easy).unwrap();
        assert_eq!(game.scheduler.pending(), 1);
        assert!(game.scheduler.is_scheduled(&Transition::DeadlockCheck));
        assert!(!game.scheduler.is_scheduled(&Transition::CountdownTick));

        game.take_events();
        game.advance(Duration::from_secs(5));

        // Neither the stale settle nor the old countdown fired
        assert!(game.take_events().is_empty());
        assert_eq!(game.session().unwrap().time_left, 0);
        assert_eq!(game.session().unwrap().score, 0);
        assert_eq!(game.phase(), Phase::Playing);
    }

    #[test]
    fn streak_spawns_blocked_tile() {
        let mut game = make_game(&["AAA"]);
        game.start(Mode::Casual, Difficulty::Normal).unwrap();

        let path = [p(5, 0), p(5, 1), p(5, 2)];

        trace(&mut game, &path);
        game.release_selection().unwrap();
        game.advance(ms(1050));
        assert!(!game.is_animating());
        assert!(game.spawn_queue().unwrap().is_empty());

        trace(&mut game, &path);
        game.release_selection().unwrap();
        assert_eq!(game.spawn_queue().unwrap().len(), 1);

        game.take_events();
        game.advance(ms(300));

        assert!(matches!(
            &game.take_events()[..],
            [Event::Refilled(RefillReport { generated: 3, forced: 1 })],
        ));
        assert!(game.grid().unwrap().at(p(0, 0)).is_blocked());
        assert!(game.spawn_queue().unwrap().is_empty());
    }

    #[test]
    fn hint() {
        let mut game = make_game(&["AAA"]);
        game.start(Mode::Casual, Difficulty::Easy).unwrap();

        assert_eq!(game.hint(), Ok(Some(vec![p(0, 0), p(0, 1), p(0, 2)])));
    }

    #[test]
    fn snapshots() {
        let mut game = make_game(&["AAA"]);
        game.start(Mode::Timed, Difficulty::Hard).unwrap();

        let json = serde_json::to_value(game.snapshot()).unwrap();
        assert_eq!(json["phase"], "playing");
        assert_eq!(json["session"]["mode"], "TIMED");
        assert_eq!(json["session"]["time_left"], 60);
        assert!(json["feedback"].is_null());

        let event = Event::GameOver { reason: GameOverReason::TimeUp };
        assert_eq!(
            serde_json::to_string(&event).unwrap(),
            r#"{"event":"game_over","reason":"time_up"}"#,
        );
    }
}
