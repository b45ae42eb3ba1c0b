use std::time::{Duration, Instant};

/// Per-process play statistics for the snake screen
pub struct GameMetrics {
    /// Set while the clock is running
    running_since: Option<Instant>,
    /// Time banked from earlier running stretches of this session
    banked: Duration,
    pub elapsed_time: Duration,
    /// Best score seen since the process started, across all variants
    pub best_this_run: u32,
    pub games_played: u32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            running_since: None,
            banked: Duration::ZERO,
            elapsed_time: Duration::ZERO,
            best_this_run: 0,
            games_played: 0,
        }
    }

    pub fn update(&mut self) {
        let running = self.running_since.map_or(Duration::ZERO, |t| t.elapsed());
        self.elapsed_time = self.banked + running;
    }

    pub fn on_game_start(&mut self) {
        self.banked = Duration::ZERO;
        self.elapsed_time = Duration::ZERO;
        self.running_since = Some(Instant::now());
    }

    /// Stop the clock without losing time played so far
    pub fn pause(&mut self) {
        if let Some(since) = self.running_since.take() {
            self.banked += since.elapsed();
        }
        self.update();
    }

    pub fn resume(&mut self) {
        if self.running_since.is_none() {
            self.running_since = Some(Instant::now());
        }
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.pause();
        self.games_played += 1;
        if final_score > self.best_this_run {
            self.best_this_run = final_score;
        }
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
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
        assert_eq!(metrics.best_this_run, 10);
        assert_eq!(metrics.games_played, 1);

        metrics.on_game_over(5);
        assert_eq!(metrics.best_this_run, 10);
        assert_eq!(metrics.games_played, 2);

        metrics.on_game_over(15);
        assert_eq!(metrics.best_this_run, 15);
        assert_eq!(metrics.games_played, 3);
    }

    #[test]
    fn test_game_start_resets_time() {
        let mut metrics = GameMetrics::new();
        metrics.on_game_start();
        std::thread::sleep(Duration::from_millis(50));
        metrics.update();

        assert!(metrics.elapsed_time.as_millis() >= 50);

        metrics.on_game_start();
        metrics.update();
        assert!(metrics.elapsed_time.as_millis() < 50);
    }

    #[test]
    fn test_pause_freezes_clock() {
        let mut metrics = GameMetrics::new();
        metrics.on_game_start();
        std::thread::sleep(Duration::from_millis(20));
        metrics.pause();
        let frozen = metrics.elapsed_time;

        std::thread::sleep(Duration::from_millis(40));
        metrics.update();
        assert_eq!(metrics.elapsed_time, frozen);

        metrics.resume();
        std::thread::sleep(Duration::from_millis(10));
        metrics.update();
        assert!(metrics.elapsed_time > frozen);
    }

    #[test]
    fn test_clock_idle_before_first_game() {
        let mut metrics = GameMetrics::new();
        std::thread::sleep(Duration::from_millis(10));
        metrics.update();
        assert_eq!(metrics.elapsed_time, Duration::ZERO);
    }
}
