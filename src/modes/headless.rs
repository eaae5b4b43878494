//! Headless autopilot runs
//!
//! Plays rounds without a terminal: a greedy pilot steers toward the nearest
//! food and the session clock is advanced by hand, one tick interval at a
//! time. Useful for soak-testing the engine and for watching scores in logs.

use std::time::Duration;

use tracing::info;

use crate::game::{Direction, GameConfig, GameState, Position};
use crate::session::{Phase, Session};

/// Outcome of a headless run
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessReport {
    pub rounds_played: u32,
    pub total_ticks: u32,
    pub scores: Vec<u32>,
    pub high_score: u32,
}

impl HeadlessReport {
    pub fn best_score(&self) -> u32 {
        self.scores.iter().copied().max().unwrap_or(0)
    }
}

pub struct HeadlessMode {
    session: Session,
    rounds: u32,
    max_ticks_per_round: u32,
}

impl HeadlessMode {
    pub fn new(session: Session, rounds: u32, max_ticks_per_round: u32) -> Self {
        Self {
            session,
            rounds,
            max_ticks_per_round,
        }
    }

    pub fn run(&mut self) -> HeadlessReport {
        // Step just past the gate threshold so every frame runs a tick
        let frame = self.session.config().tick_interval() + Duration::from_millis(1);
        let mut now = Duration::ZERO;
        let mut report = HeadlessReport {
            rounds_played: 0,
            total_ticks: 0,
            scores: Vec::new(),
            high_score: self.session.high_score(),
        };

        for round in 0..self.rounds {
            self.session.restart(now);
            let mut ticks = 0;

            while self.session.phase() == Phase::Playing {
                if ticks >= self.max_ticks_per_round {
                    self.session.end_round();
                    break;
                }

                let direction = choose_direction(
                    self.session.config(),
                    self.session.state(),
                    self.session.heading(),
                );
                self.session.steer(direction);

                now += frame;
                if self.session.update(now).is_some() {
                    ticks += 1;
                }
            }

            let score = self.session.state().score;
            info!(round, score, ticks, "headless round finished");
            report.rounds_played += 1;
            report.total_ticks += ticks;
            report.scores.push(score);
        }

        report.high_score = self.session.high_score();
        report
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}

/// Pick the safe move that gets closest to the bonus (if any) or the food.
/// With no safe move the current heading is kept.
pub fn choose_direction(config: &GameConfig, state: &GameState, heading: Direction) -> Direction {
    let head = state.snake.head();
    let target = state.bonus.map(|bonus| bonus.position).unwrap_or(state.food);

    [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ]
    .into_iter()
    .filter(|direction| !direction.is_opposite(heading))
    .map(|direction| (direction, head.moved_in_direction(direction, config.cell_size)))
    .filter(|(_, next)| is_safe(config, state, *next))
    .min_by_key(|(direction, next)| (distance(*next, target), *direction != heading))
    .map(|(direction, _)| direction)
    .unwrap_or(heading)
}

fn is_safe(config: &GameConfig, state: &GameState, next: Position) -> bool {
    if !config.is_interior(next) {
        return false;
    }
    // The tail moves away this tick unless the snake is about to eat
    let body = &state.snake.body;
    let keep = if next == state.food { body.len() } else { body.len() - 1 };
    !body[..keep].contains(&next)
}

fn distance(a: Position, b: Position) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}
