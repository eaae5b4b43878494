use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::{
    config::{BonusExpiry, GameConfig},
    direction::Direction,
    state::{BonusFood, CollisionType, GameState, Position, Snake},
};

/// Discrete audio trigger produced by a step, fired at most once per event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    FoodEaten,
    BonusSpawned,
    BonusEaten,
    GameOver,
}

/// Information about a step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate ordinary food this step
    pub ate_food: bool,
    /// Whether the snake ate the bonus food this step
    pub ate_bonus: bool,
    /// Whether a new bonus appeared this step
    pub bonus_spawned: bool,
    /// Whether the previous bonus ran out this step
    pub bonus_expired: bool,
    /// Type of collision if one occurred
    pub collision_type: Option<CollisionType>,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Whether the round has ended
    pub terminated: bool,
    /// Additional information about the step
    pub info: StepInfo,
    /// Audio cues raised by this step, in the order they happened
    pub cues: Vec<SoundCue>,
}

impl StepResult {
    fn finished() -> Self {
        Self {
            terminated: true,
            info: StepInfo::default(),
            cues: Vec::new(),
        }
    }
}

/// The game engine that handles all game logic
///
/// The engine owns only configuration and randomness. Everything that
/// changes during a round lives in [`GameState`], which the caller owns and
/// passes in, so several rounds can run side by side.
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create an engine whose spawn positions are reproducible
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Cell the snake's head starts on
    pub fn start_position(&self) -> Position {
        let cell = self.config.cell_size;
        Position::new(
            self.config.grid_columns() / 2 * cell,
            self.config.grid_rows() / 2 * cell,
        )
    }

    /// Reset the game to initial state
    pub fn reset(&mut self) -> GameState {
        let snake = Snake::new(
            self.start_position(),
            Direction::Right,
            self.config.initial_snake_length,
            self.config.cell_size,
        );

        let food = self.spawn_position(&snake, &[]);

        GameState::new(snake, food)
    }

    /// Advance the round by one tick.
    ///
    /// `now` is the session time of this tick; it is only used to age the
    /// bonus food. Once the round is over further calls change nothing.
    pub fn step(&mut self, state: &mut GameState, direction: Direction, now: Duration) -> StepResult {
        if !state.is_alive {
            return StepResult::finished();
        }

        let mut info = StepInfo::default();
        let mut cues = Vec::new();

        self.expire_bonus(state, now, &mut info, &mut cues);

        let new_head = state
            .snake
            .head()
            .moved_in_direction(direction, self.config.cell_size);

        // Ordinary food wins when both could be eaten on the same tick
        let ate_food = new_head == state.food;
        let ate_bonus = !ate_food
            && state
                .bonus
                .is_some_and(|bonus| new_head.within(bonus.position, self.config.bonus_tolerance));
        let grow = ate_food || (ate_bonus && self.config.grow_on_bonus);

        state.snake.advance(new_head, grow);
        state.steps += 1;

        if let Some(collision_type) = self.check_collision(&state.snake) {
            debug!(?collision_type, head = ?new_head, score = state.score, "collision");
            state.is_alive = false;
            state.foods_since_bonus = 0;
            cues.push(SoundCue::GameOver);
            info.collision_type = Some(collision_type);

            return StepResult {
                terminated: true,
                info,
                cues,
            };
        }

        if ate_food {
            state.score += self.config.food_reward;
            state.foods_since_bonus += 1;
            cues.push(SoundCue::FoodEaten);
            info.ate_food = true;

            let bonus_position = state.bonus.map(|bonus| bonus.position);
            state.food = self.spawn_position(&state.snake, bonus_position.as_slice());
            debug!(food = ?state.food, score = state.score, "food eaten");

            if state.bonus.is_none() && state.foods_since_bonus % self.config.bonus_threshold == 0 {
                self.spawn_bonus(state, now);
                cues.push(SoundCue::BonusSpawned);
                info.bonus_spawned = true;
            }
        } else if ate_bonus {
            state.score += self.config.bonus_reward;
            state.bonus = None;
            cues.push(SoundCue::BonusEaten);
            info.ate_bonus = true;
            debug!(score = state.score, "bonus eaten");
        }

        StepResult {
            terminated: false,
            info,
            cues,
        }
    }

    /// Apply the expiry policy to a bonus that outlived its duration
    fn expire_bonus(
        &mut self,
        state: &mut GameState,
        now: Duration,
        info: &mut StepInfo,
        cues: &mut Vec<SoundCue>,
    ) {
        let Some(bonus) = state.bonus else {
            return;
        };
        if !bonus.is_expired(now, self.config.bonus_duration()) {
            return;
        }

        info.bonus_expired = true;
        match self.config.bonus_expiry {
            BonusExpiry::Clear => {
                debug!(position = ?bonus.position, "bonus expired");
                state.bonus = None;
            }
            BonusExpiry::Respawn => {
                self.spawn_bonus(state, now);
                cues.push(SoundCue::BonusSpawned);
                info.bonus_spawned = true;
            }
        }
    }

    fn spawn_bonus(&mut self, state: &mut GameState, now: Duration) {
        let position = self.spawn_position(&state.snake, &[state.food]);
        debug!(?position, "bonus spawned");
        state.bonus = Some(BonusFood::new(position, now));
        state.foods_since_bonus = 0;
    }

    /// Check if the head has left the playfield or run into the body
    fn check_collision(&self, snake: &Snake) -> Option<CollisionType> {
        let head = snake.head();

        if snake.collides_with_body(head) {
            return Some(CollisionType::SelfCollision);
        }

        if !self.is_in_bounds(head) {
            return Some(CollisionType::Wall);
        }

        None
    }

    /// Check if a position lies inside the wall ring
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        self.config.is_interior(pos)
    }

    /// Pick a random interior cell that is not covered by the snake or by
    /// any of the `taken` positions.
    fn spawn_position(&mut self, snake: &Snake, taken: &[Position]) -> Position {
        let columns = self.config.interior_columns();
        let rows = self.config.interior_rows();
        let is_free = |pos: &Position| !snake.occupies(*pos) && !taken.contains(pos);

        // Rejection sampling is fast while the board is mostly empty
        let attempts = (columns.max(0) as usize)
            .saturating_mul(rows.max(0) as usize)
            .saturating_mul(2)
            .max(16);
        for _ in 0..attempts {
            let pos = self.random_cell(columns, rows);
            if is_free(&pos) {
                return pos;
            }
        }

        let cell = self.config.cell_size;
        let free: Vec<Position> = (1..=rows)
            .flat_map(|row| (1..=columns).map(move |col| Position::new(col * cell, row * cell)))
            .filter(|pos| is_free(pos))
            .collect();

        if free.is_empty() {
            // Board is full; nothing better to offer
            return self.random_cell(columns, rows);
        }
        free[self.rng.gen_range(0..free.len())]
    }

    fn random_cell(&mut self, columns: i32, rows: i32) -> Position {
        let cell = self.config.cell_size;
        let col = self.rng.gen_range(1..=columns);
        let row = self.rng.gen_range(1..=rows);
        Position::new(col * cell, row * cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CELL: i32 = 20;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn engine() -> GameEngine {
        GameEngine::with_seed(GameConfig::default(), 7)
    }

    /// A single-segment snake at `head` with food parked far away
    fn state_at(head: Position) -> GameState {
        GameState::new(Snake::from_segments(vec![head]), Position::new(CELL, CELL))
    }

    #[test]
    fn test_reset() {
        let mut engine = engine();
        let state = engine.reset();

        assert!(state.is_alive);
        assert_eq!(state.score, 0);
        assert_eq!(state.steps, 0);
        assert_eq!(state.snake.len(), 1);
        assert_eq!(state.snake.head(), Position::new(320, 240));
        assert!(state.bonus.is_none());
        assert!(engine.is_in_bounds(state.food));
        assert!(!state.is_occupied_by_snake(state.food));
    }

    #[test]
    fn test_single_tick_without_food() {
        let mut engine = engine();
        let mut state = engine.reset();
        state.food = Position::new(CELL, CELL);

        let result = engine.step(&mut state, Direction::Right, ms(101));

        assert!(!result.terminated);
        assert!(result.cues.is_empty());
        assert_eq!(state.snake.head(), Position::new(340, 240));
        assert_eq!(state.snake.len(), 1);
        assert_eq!(state.score, 0);
        assert_eq!(state.steps, 1);
    }

    #[test]
    fn test_food_consumption() {
        let mut engine = engine();
        let mut state = engine.reset();
        state.food = state.snake.head().moved_in_direction(Direction::Right, CELL);

        let result = engine.step(&mut state, Direction::Right, ms(101));

        assert!(result.info.ate_food);
        assert_eq!(result.cues, vec![SoundCue::FoodEaten]);
        assert_eq!(state.score, 10);
        assert_eq!(state.snake.len(), 2);
        assert_eq!(state.foods_since_bonus, 1);
        assert!(!state.is_occupied_by_snake(state.food));
    }

    #[test]
    fn test_bonus_spawns_on_fifth_food() {
        let mut engine = engine();
        let mut state = state_at(Position::new(60, 240));

        for i in 1..=5 {
            state.food = state.snake.head().moved_in_direction(Direction::Right, CELL);
            let result = engine.step(&mut state, Direction::Right, ms(i * 100));

            assert!(result.info.ate_food);
            if i < 5 {
                assert!(!result.info.bonus_spawned, "bonus spawned early at food {i}");
                assert!(state.bonus.is_none());
            } else {
                assert!(result.info.bonus_spawned);
                assert_eq!(
                    result.cues,
                    vec![SoundCue::FoodEaten, SoundCue::BonusSpawned]
                );
            }
        }

        let bonus = state.bonus.expect("bonus should be active");
        assert_eq!(bonus.spawned_at, ms(500));
        assert_eq!(state.foods_since_bonus, 0);
        assert!(engine.is_in_bounds(bonus.position));
        assert_ne!(bonus.position, state.food);
        assert_eq!(state.score, 50);
    }

    #[test]
    fn test_no_second_bonus_while_active() {
        let mut engine = engine();
        let mut state = state_at(Position::new(60, 240));
        state.bonus = Some(BonusFood::new(Position::new(600, 440), ms(0)));
        state.foods_since_bonus = 4;

        state.food = state.snake.head().moved_in_direction(Direction::Right, CELL);
        let result = engine.step(&mut state, Direction::Right, ms(100));

        assert!(result.info.ate_food);
        assert!(!result.info.bonus_spawned);
        assert_eq!(state.foods_since_bonus, 5);
        assert_eq!(state.bonus.unwrap().position, Position::new(600, 440));
    }

    #[test]
    fn test_bonus_consumption() {
        let mut engine = engine();
        let mut state = state_at(Position::new(100, 100));
        state.bonus = Some(BonusFood::new(Position::new(120, 100), ms(0)));

        let result = engine.step(&mut state, Direction::Right, ms(100));

        assert!(result.info.ate_bonus);
        assert!(!result.info.ate_food);
        assert_eq!(result.cues, vec![SoundCue::BonusEaten]);
        assert_eq!(state.score, 50);
        assert!(state.bonus.is_none());
        assert_eq!(state.foods_since_bonus, 0);
        assert_eq!(state.snake.len(), 2);
    }

    #[test]
    fn test_bonus_without_growth() {
        let config = GameConfig {
            grow_on_bonus: false,
            ..Default::default()
        };
        let mut engine = GameEngine::with_seed(config, 1);
        let mut state = state_at(Position::new(100, 100));
        state.bonus = Some(BonusFood::new(Position::new(120, 100), ms(0)));

        engine.step(&mut state, Direction::Right, ms(100));

        assert_eq!(state.score, 50);
        assert_eq!(state.snake.len(), 1);
    }

    #[test]
    fn test_food_takes_precedence_over_bonus() {
        let mut engine = engine();
        let mut state = state_at(Position::new(100, 100));
        state.food = Position::new(120, 100);
        state.bonus = Some(BonusFood::new(Position::new(120, 100), ms(0)));

        let result = engine.step(&mut state, Direction::Right, ms(100));

        assert!(result.info.ate_food);
        assert!(!result.info.ate_bonus);
        assert_eq!(state.score, 10);
        assert!(state.bonus.is_some());
    }

    #[test]
    fn test_bonus_expires_and_clears() {
        let mut engine = engine();
        let mut state = state_at(Position::new(100, 100));
        state.bonus = Some(BonusFood::new(Position::new(400, 400), ms(1000)));

        let result = engine.step(&mut state, Direction::Right, ms(5000));
        assert!(!result.info.bonus_expired);
        assert!(state.bonus.is_some());

        let result = engine.step(&mut state, Direction::Right, ms(5001));
        assert!(result.info.bonus_expired);
        assert!(!result.info.bonus_spawned);
        assert!(result.cues.is_empty());
        assert!(state.bonus.is_none());
    }

    #[test]
    fn test_bonus_expires_and_respawns() {
        let config = GameConfig {
            bonus_expiry: BonusExpiry::Respawn,
            ..Default::default()
        };
        let mut engine = GameEngine::with_seed(config, 3);
        let mut state = state_at(Position::new(100, 100));
        state.bonus = Some(BonusFood::new(Position::new(400, 400), ms(0)));

        let result = engine.step(&mut state, Direction::Right, ms(4500));

        assert!(result.info.bonus_expired);
        assert!(result.info.bonus_spawned);
        assert_eq!(result.cues, vec![SoundCue::BonusSpawned]);
        let bonus = state.bonus.expect("bonus should have respawned");
        assert_eq!(bonus.spawned_at, ms(4500));
    }

    #[test]
    fn test_expired_bonus_cannot_be_eaten() {
        let mut engine = engine();
        let mut state = state_at(Position::new(100, 100));
        state.bonus = Some(BonusFood::new(Position::new(120, 100), ms(0)));

        let result = engine.step(&mut state, Direction::Right, ms(4001));

        assert!(result.info.bonus_expired);
        assert!(!result.info.ate_bonus);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_wall_collision() {
        let mut engine = engine();
        // One cell short of the right wall at x = 640 - 20
        let mut state = state_at(Position::new(600, 240));
        state.score = 40;
        state.foods_since_bonus = 3;

        let result = engine.step(&mut state, Direction::Right, ms(100));

        assert!(result.terminated);
        assert!(!state.is_alive);
        assert_eq!(state.score, 40);
        assert_eq!(state.foods_since_bonus, 0);
        assert_eq!(result.info.collision_type, Some(CollisionType::Wall));
        assert_eq!(result.cues, vec![SoundCue::GameOver]);
        assert_eq!(state.snake.head().x, 620);
    }

    #[test]
    fn test_wall_collision_top_left() {
        let mut engine = engine();

        let mut state = state_at(Position::new(20, 240));
        assert!(engine.step(&mut state, Direction::Left, ms(100)).terminated);

        let mut state = state_at(Position::new(240, 20));
        assert!(engine.step(&mut state, Direction::Up, ms(100)).terminated);

        let mut state = state_at(Position::new(240, 440));
        assert!(engine.step(&mut state, Direction::Down, ms(100)).terminated);
    }

    #[test]
    fn test_self_collision() {
        let mut engine = engine();
        // Head at (100,100) heading Down into (100,120), which is still body
        let snake = Snake::from_segments(vec![
            Position::new(100, 100),
            Position::new(120, 100),
            Position::new(120, 120),
            Position::new(100, 120),
            Position::new(80, 120),
        ]);
        let mut state = GameState::new(snake, Position::new(300, 300));
        state.score = 30;
        state.foods_since_bonus = 3;

        let result = engine.step(&mut state, Direction::Down, ms(100));

        assert!(result.terminated);
        assert_eq!(
            result.info.collision_type,
            Some(CollisionType::SelfCollision)
        );
        assert_eq!(state.score, 30);
        assert_eq!(state.foods_since_bonus, 0);
    }

    #[test]
    fn test_moving_into_vacated_tail_is_safe() {
        let mut engine = engine();
        // A 2x2 loop: the head chases the tail, which moves away this tick
        let snake = Snake::from_segments(vec![
            Position::new(100, 100),
            Position::new(120, 100),
            Position::new(120, 120),
            Position::new(100, 120),
        ]);
        let mut state = GameState::new(snake, Position::new(300, 300));

        let result = engine.step(&mut state, Direction::Down, ms(100));

        assert!(!result.terminated);
        assert_eq!(state.snake.head(), Position::new(100, 120));
    }

    #[test]
    fn test_terminated_game_no_update() {
        let mut engine = engine();
        let mut state = engine.reset();
        state.is_alive = false;
        state.score = 40;
        let steps_before = state.steps;
        let head_before = state.snake.head();

        let result = engine.step(&mut state, Direction::Right, ms(100));

        assert!(result.terminated);
        assert!(result.cues.is_empty());
        assert_eq!(state.steps, steps_before);
        assert_eq!(state.snake.head(), head_before);
        assert_eq!(state.score, 40);
    }

    #[test]
    fn test_spawn_avoids_snake_on_crowded_board() {
        let config = GameConfig::new(100, 100); // 3x3 interior
        let mut engine = GameEngine::with_seed(config, 11);
        let mut body = Vec::new();
        for row in 1..=3 {
            for col in 1..=3 {
                body.push(Position::new(col * CELL, row * CELL));
            }
        }
        // Leave exactly one free cell
        let free = body.remove(4);
        let snake = Snake::from_segments(body);

        for _ in 0..20 {
            assert_eq!(engine.spawn_position(&snake, &[]), free);
        }
    }

    #[test]
    fn test_seeded_engines_agree() {
        let mut a = GameEngine::with_seed(GameConfig::default(), 42);
        let mut b = GameEngine::with_seed(GameConfig::default(), 42);
        assert_eq!(a.reset(), b.reset());
    }

    mod proptests {
        use super::*;
        use crate::game::direction::DirectionController;
        use proptest::prelude::*;

        fn any_direction() -> impl Strategy<Value = Direction> {
            prop_oneof![
                Just(Direction::Up),
                Just(Direction::Down),
                Just(Direction::Left),
                Just(Direction::Right),
            ]
        }

        proptest! {
            #[test]
            fn step_accounting_holds(
                seed in 0u64..1000,
                inputs in proptest::collection::vec(any_direction(), 1..200)
            ) {
                let mut engine = GameEngine::with_seed(GameConfig::small(), seed);
                let mut state = engine.reset();
                let mut controller = DirectionController::new(Direction::Right);

                for (tick, input) in inputs.into_iter().enumerate() {
                    controller.request(input);
                    let direction = controller.commit();
                    let len_before = state.snake.len();
                    let score_before = state.score;

                    let now = Duration::from_millis(tick as u64 * 101);
                    let result = engine.step(&mut state, direction, now);

                    if result.terminated {
                        prop_assert_eq!(state.score, score_before);
                        prop_assert_eq!(
                            result.cues.iter().filter(|c| **c == SoundCue::GameOver).count(),
                            1
                        );
                        break;
                    }

                    if result.info.ate_food {
                        prop_assert_eq!(state.score, score_before + 10);
                        prop_assert_eq!(state.snake.len(), len_before + 1);
                        prop_assert!(!result.info.ate_bonus);
                    } else if result.info.ate_bonus {
                        prop_assert_eq!(state.score, score_before + 50);
                        prop_assert!(state.bonus.is_none());
                    } else {
                        prop_assert_eq!(state.score, score_before);
                        prop_assert_eq!(state.snake.len(), len_before);
                    }

                    prop_assert!(engine.is_in_bounds(state.food));
                    prop_assert!(!state.snake.occupies(state.food));
                    for segment in &state.snake.body {
                        prop_assert_eq!(segment.x % CELL, 0);
                        prop_assert_eq!(segment.y % CELL, 0);
                    }
                }
            }

            #[test]
            fn spawned_positions_stay_inside(seed in 0u64..5000) {
                let mut engine = GameEngine::with_seed(GameConfig::default(), seed);
                let state = engine.reset();
                prop_assert!(engine.is_in_bounds(state.food));
                prop_assert!(!state.is_occupied_by_snake(state.food));
            }
        }
    }
}
