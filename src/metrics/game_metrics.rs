use std::time::Duration;

use crate::game::StepInfo;

/// Per-session statistics shown alongside the playfield
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameMetrics {
    /// Session time at which the current round started
    pub round_started_at: Duration,
    /// Length of the current round so far
    pub elapsed_time: Duration,
    /// Best score seen in this process, independent of the stored one
    pub best_score: u32,
    pub games_played: u32,
    pub foods_eaten: u32,
    pub bonuses_eaten: u32,
    pub bonuses_missed: u32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, now: Duration) {
        self.elapsed_time = now.saturating_sub(self.round_started_at);
    }

    pub fn on_game_start(&mut self, now: Duration) {
        self.round_started_at = now;
        self.elapsed_time = Duration::ZERO;
    }

    pub fn on_step(&mut self, info: &StepInfo) {
        if info.ate_food {
            self.foods_eaten += 1;
        }
        if info.ate_bonus {
            self.bonuses_eaten += 1;
        }
        if info.bonus_expired {
            self.bonuses_missed += 1;
        }
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.games_played += 1;
        if final_score > self.best_score {
            self.best_score = final_score;
        }
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }

    pub fn format_summary(&self) -> String {
        format!(
            "games: {} | best: {} | food: {} | bonus: {} eaten, {} missed",
            self.games_played, self.best_score, self.foods_eaten, self.bonuses_eaten, self.bonuses_missed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_formatting() {
        let mut metrics = GameMetrics::new();
        metrics.elapsed_time = Duration::from_secs(125);
        assert_eq!(metrics.format_time(), "02:05");

        metrics.elapsed_time = Duration::from_secs(0);
        assert_eq!(metrics.format_time(), "00:00");

        metrics.elapsed_time = Duration::from_secs(3661);
        assert_eq!(metrics.format_time(), "61:01");
    }

    #[test]
    fn test_best_score_tracking() {
        let mut metrics = GameMetrics::new();

        metrics.on_game_over(10);
        assert_eq!(metrics.best_score, 10);
        assert_eq!(metrics.games_played, 1);

        metrics.on_game_over(5);
        assert_eq!(metrics.best_score, 10); // Should not decrease
        assert_eq!(metrics.games_played, 2);

        metrics.on_game_over(15);
        assert_eq!(metrics.best_score, 15);
        assert_eq!(metrics.games_played, 3);
    }

    #[test]
    fn test_game_start_resets_time() {
        let mut metrics = GameMetrics::new();
        metrics.update(Duration::from_secs(30));
        assert_eq!(metrics.elapsed_time, Duration::from_secs(30));

        metrics.on_game_start(Duration::from_secs(30));
        metrics.update(Duration::from_secs(32));
        assert_eq!(metrics.elapsed_time, Duration::from_secs(2));
    }

    #[test]
    fn test_step_counters() {
        let mut metrics = GameMetrics::new();
        metrics.on_step(&StepInfo {
            ate_food: true,
            ..Default::default()
        });
        metrics.on_step(&StepInfo {
            ate_bonus: true,
            ..Default::default()
        });
        metrics.on_step(&StepInfo {
            bonus_expired: true,
            ..Default::default()
        });

        assert_eq!(metrics.foods_eaten, 1);
        assert_eq!(metrics.bonuses_eaten, 1);
        assert_eq!(metrics.bonuses_missed, 1);
        assert!(metrics.format_summary().contains("bonus: 1 eaten, 1 missed"));
    }
}
