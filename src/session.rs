//! One player's session: the screens around a round and the rounds themselves
//!
//! A session owns every piece of mutable game data, so nothing lives in
//! globals and restarting is just building a fresh [`GameState`]. The phases
//! form a small state machine:
//!
//! ```text
//! Intro --play--> Playing --collision--> GameOver --restart--> Playing
//!   \                                       |
//!    \-------------- quit ------------------+--> (exit)
//! ```
//!
//! Time is always supplied by the caller as a `Duration` since the session
//! began, which keeps the whole session drivable from tests.

use std::time::Duration;

use tracing::info;

use crate::audio::AudioSink;
use crate::error::ResourceError;
use crate::game::{
    Direction, DirectionController, GameConfig, GameEngine, GameState, StepResult, TickGate,
};
use crate::highscore::HighScoreStore;
use crate::metrics::GameMetrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Title screen, waiting for the player to start
    Intro,
    /// A round is running
    Playing,
    /// The last round ended; waiting for restart or quit
    GameOver,
}

pub struct Session {
    engine: GameEngine,
    state: GameState,
    controller: DirectionController,
    gate: TickGate,
    store: HighScoreStore,
    audio: Box<dyn AudioSink>,
    metrics: GameMetrics,
    phase: Phase,
    high_score: u32,
    /// Set when the round that just ended beat the stored high score
    new_high_score: bool,
    should_quit: bool,
}

impl Session {
    /// Validate the configuration and open a session on the intro screen
    pub fn new(
        config: GameConfig,
        store: HighScoreStore,
        audio: Box<dyn AudioSink>,
    ) -> Result<Self, ResourceError> {
        config.validate()?;
        Ok(Self::with_engine(GameEngine::new(config), store, audio))
    }

    /// Open a session around an existing engine, e.g. a seeded one
    pub fn with_engine(
        mut engine: GameEngine,
        store: HighScoreStore,
        audio: Box<dyn AudioSink>,
    ) -> Self {
        let high_score = store.load();
        let state = engine.reset();
        let gate = TickGate::new(engine.config().tick_interval(), Duration::ZERO);

        Self {
            engine,
            state,
            controller: DirectionController::new(Direction::Right),
            gate,
            store,
            audio,
            metrics: GameMetrics::new(),
            phase: Phase::Intro,
            high_score,
            new_high_score: false,
            should_quit: false,
        }
    }

    /// Leave the intro or game-over screen and start a round
    pub fn play(&mut self, now: Duration) {
        match self.phase {
            Phase::Intro | Phase::GameOver => self.restart(now),
            Phase::Playing => {}
        }
    }

    /// Start a fresh round. A round still running is finished first so its
    /// score is recorded.
    pub fn restart(&mut self, now: Duration) {
        self.end_round();
        self.state = self.engine.reset();
        self.controller = DirectionController::new(Direction::Right);
        self.gate.reset(now);
        self.metrics.on_game_start(now);
        self.new_high_score = false;
        self.phase = Phase::Playing;
        info!(high_score = self.high_score, "round started");
    }

    /// Forward a direction key to the controller while a round is running
    pub fn steer(&mut self, direction: Direction) {
        if self.phase == Phase::Playing {
            self.controller.request(direction);
        }
    }

    pub fn quit(&mut self) {
        info!(score = self.state.score, "quit requested");
        self.should_quit = true;
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Run one frame: advance the round if the tick gate is open.
    ///
    /// Returns the step result when a step ran. Cues are handed to the audio
    /// sink here, once each.
    pub fn update(&mut self, now: Duration) -> Option<StepResult> {
        if self.phase != Phase::Playing {
            return None;
        }
        self.metrics.update(now);

        if !self.gate.ready(now) {
            return None;
        }

        let direction = self.controller.commit();
        let result = self.engine.step(&mut self.state, direction, now);

        for cue in &result.cues {
            self.audio.play(*cue);
        }
        self.metrics.on_step(&result.info);

        if result.terminated {
            self.finish_round();
        }

        Some(result)
    }

    /// End a running round early, keeping its score as if the snake crashed
    pub fn end_round(&mut self) {
        if self.phase == Phase::Playing {
            self.finish_round();
        }
    }

    fn finish_round(&mut self) {
        let score = self.state.score;
        self.metrics.on_game_over(score);
        self.new_high_score = score > self.high_score;
        self.high_score = self.store.record(self.high_score, score);
        self.phase = Phase::GameOver;
        info!(
            score,
            high_score = self.high_score,
            steps = self.state.steps,
            "round over"
        );
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        self.engine.config()
    }

    pub fn metrics(&self) -> &GameMetrics {
        &self.metrics
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn is_new_high_score(&self) -> bool {
        self.new_high_score
    }

    /// Direction the snake will take on the next tick
    pub fn heading(&self) -> Direction {
        self.controller.current()
    }

    /// Time left on the active bonus food, if any
    pub fn bonus_remaining(&self, now: Duration) -> Option<Duration> {
        let lifetime = self.engine.config().bonus_duration();
        self.state
            .bonus
            .map(|bonus| bonus.remaining(now, lifetime))
    }

    /// Time until the next tick may run
    pub fn until_next_tick(&self, now: Duration) -> Duration {
        self.gate.until_next(now)
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.audio.set_muted(muted);
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }
}
