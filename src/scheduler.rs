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

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Timer<T> {
    id: TimerId,
    due: Duration,
    period: Option<Duration>,
    generation: u64,
    payload: T,
}

// Delayed and repeating events measured against a virtual clock. The
// clock only moves when the owner asks for due events so the same
// sequence of calls always fires the same events in the same order.
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    now: Duration,
    generation: u64,
    next_id: u64,
    timers: Vec<Timer<T>>,
}

impl<T: Clone + PartialEq> Scheduler<T> {
    pub fn new() -> Scheduler<T> {
        Scheduler {
            now: Duration::ZERO,
            generation: 0,
            next_id: 0,
            timers: Vec::new(),
        }
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn add(
        &mut self,
        delay: Duration,
        period: Option<Duration>,
        payload: T,
    ) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;

        self.timers.push(Timer {
            id,
            due: self.now + delay,
            period,
            generation: self.generation,
            payload,
        });

        id
    }

    pub fn schedule_once(&mut self, delay: Duration, payload: T) -> TimerId {
        self.add(delay, None, payload)
    }

    // Registers a repeating event. The payload acts as the key so
    // registering it again replaces the previous registration instead
    // of adding a second one.
    pub fn schedule_repeating(
        &mut self,
        period: Duration,
        payload: T,
    ) -> TimerId {
        assert!(!period.is_zero());

        self.cancel_event(&payload);
        self.add(period, Some(period), payload)
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|timer| timer.id != id);
        self.timers.len() != before
    }

    // Cancels every pending timer carrying the payload
    pub fn cancel_event(&mut self, payload: &T) -> bool {
        let before = self.timers.len();
        self.timers.retain(|timer| timer.payload != *payload);
        self.timers.len() != before
    }

    // Starts a new generation. Anything scheduled before this can no
    // longer fire.
    pub fn cancel_all(&mut self) {
        self.generation += 1;
        self.timers.clear();
    }

    pub fn is_scheduled(&self, payload: &T) -> bool {
        self.live_timers().any(|timer| timer.payload == *payload)
    }

    pub fn pending(&self) -> usize {
        self.live_timers().count()
    }

    fn live_timers(&self) -> impl Iterator<Item = &Timer<T>> {
        self.timers.iter().filter(|timer| timer.generation == self.generation)
    }

    // Removes and returns the earliest event that is due at or before
    // `until`, moving the clock to its due time. Events due at the same
    // time come out in the order they were scheduled. A repeating
    // event is put back for its next period.
    pub fn pop_due(&mut self, until: Duration) -> Option<T> {
        let generation = self.generation;
        self.timers.retain(|timer| timer.generation == generation);

        let index = self.timers.iter()
            .enumerate()
            .filter(|(_, timer)| timer.due <= until)
            .min_by_key(|(_, timer)| (timer.due, timer.id.0))
            .map(|(index, _)| index)?;

        let timer = self.timers.remove(index);

        self.now = self.now.max(timer.due);

        let payload = timer.payload.clone();

        if let Some(period) = timer.period {
            self.timers.push(Timer {
                due: timer.due + period,
                ..timer
            });
        }

        Some(payload)
    }

    // Moves the clock forward without firing anything. Used once all
    // of the due events have been popped.
    pub fn advance_to(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }
}

impl<T: Clone + PartialEq> Default for Scheduler<T> {
    fn default() -> Scheduler<T> {
        Scheduler::new()
    }
}
