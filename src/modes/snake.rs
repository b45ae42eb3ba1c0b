use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use log::{debug, info};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::io::{stderr, Stderr};
use std::time::Duration;
use tokio::time::interval;

use super::screen::{MenuSelection, Screen};
use crate::game::{Difficulty, GameConfig, GameEngine, GameState, Mode};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;
use crate::scoreboard::Scoreboard;

const RENDER_INTERVAL: Duration = Duration::from_millis(33);

/// Interactive snake: menu, play loop, pause and game-over screens
pub struct SnakeMode {
    engine: GameEngine,
    state: GameState,
    scoreboard: Scoreboard,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    menu: MenuSelection,
    screen: Screen,
    /// Whether the last known terminal size can show the whole grid
    viewport_fits: bool,
    should_quit: bool,
}

impl SnakeMode {
    pub fn new(config: GameConfig, scoreboard: Scoreboard) -> Self {
        Self::with_engine(GameEngine::new(config), scoreboard)
    }

    pub fn with_engine(mut engine: GameEngine, scoreboard: Scoreboard) -> Self {
        let menu = MenuSelection::default();
        // Placeholder session so the menu has a grid size to show
        let state = engine.reset(menu.difficulty(), menu.mode());

        Self {
            engine,
            state,
            scoreboard,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            menu,
            screen: Screen::Menu,
            viewport_fits: true,
            should_quit: false,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn menu(&self) -> &MenuSelection {
        &self.menu
    }

    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn viewport_fits(&self) -> bool {
        self.viewport_fits
    }

    /// Record the terminal size; ticks are held while the grid does not fit
    pub fn set_viewport(&mut self, width: u16, height: u16) {
        let fits = Renderer::fits(Rect::new(0, 0, width, height), &self.state);
        if fits != self.viewport_fits {
            debug!("terminal {}x{}, grid fits: {}", width, height, fits);
        }
        self.viewport_fits = fits;
    }

    /// Tick period of the active session
    pub fn tick_interval(&self) -> Duration {
        self.state.difficulty.tick_interval()
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let size = terminal.size().context("Failed to read terminal size")?;
        self.set_viewport(size.width, size.height);

        let mut tick_period = self.tick_interval();
        let mut tick_timer = interval(tick_period);
        let mut render_timer = interval(RENDER_INTERVAL);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(e)) => return Err(e).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }

                    // A new session may have switched difficulty
                    if self.tick_interval() != tick_period {
                        tick_period = self.tick_interval();
                        tick_timer = interval(tick_period);
                        debug!("tick period now {:?}", tick_period);
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    self.tick();
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update();
                    terminal.draw(|frame| {
                        self.renderer.render(
                            frame,
                            self.screen,
                            &self.menu,
                            &self.state,
                            &self.scoreboard,
                            &self.metrics,
                        );
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        info!("leaving snake after {} games", self.metrics.games_played);
        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            // Only process key press events, not release
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                let action = self.input_handler.handle_key_event(key);
                self.handle_action(action);
            }
            Event::Resize(width, height) => self.set_viewport(width, height),
            _ => {}
        }
    }

    /// Apply one key action to the screen state machine
    pub fn handle_action(&mut self, action: KeyAction) {
        if action == KeyAction::Interrupt {
            self.should_quit = true;
            return;
        }

        match (self.screen, action) {
            (Screen::Menu, KeyAction::Turn(direction)) => self.menu.navigate(direction),
            (Screen::Menu, KeyAction::Confirm) => {
                self.start_session(self.menu.difficulty(), self.menu.mode())
            }
            (Screen::Menu, KeyAction::Back | KeyAction::Quit) => self.should_quit = true,

            // Turns still queue while paused, through the same reversal guard
            (Screen::Playing | Screen::Paused, KeyAction::Turn(direction)) => {
                self.engine.turn(&mut self.state, direction);
            }
            (Screen::Playing, KeyAction::TogglePause) => {
                self.screen = Screen::Paused;
                self.metrics.pause();
            }
            (Screen::Paused, KeyAction::TogglePause) => {
                self.screen = Screen::Playing;
                self.metrics.resume();
            }

            (Screen::Playing | Screen::Paused | Screen::GameOver { .. }, KeyAction::Restart) => {
                self.start_session(self.state.difficulty, self.state.mode)
            }
            (Screen::Playing | Screen::Paused | Screen::GameOver { .. }, KeyAction::Back) => {
                self.return_to_menu()
            }
            (Screen::GameOver { .. }, KeyAction::Quit) => self.should_quit = true,

            _ => {}
        }
    }

    /// Advance the session by one tick if it is running
    pub fn tick(&mut self) {
        if self.screen != Screen::Playing || !self.viewport_fits {
            return;
        }
        if !self.engine.advance(&mut self.state) {
            self.enter_game_over();
        }
    }

    fn start_session(&mut self, difficulty: Difficulty, mode: Mode) {
        self.state = self.engine.reset(difficulty, mode);
        self.screen = Screen::Playing;
        self.metrics.on_game_start();
    }

    fn return_to_menu(&mut self) {
        self.menu = MenuSelection::new(self.state.difficulty, self.state.mode);
        self.screen = Screen::Menu;
        self.metrics.pause();
    }

    fn enter_game_over(&mut self) {
        let new_best =
            self.scoreboard
                .record_score(self.state.difficulty, self.state.mode, self.state.score);
        self.metrics.on_game_over(self.state.score);
        self.screen = Screen::GameOver { new_best };
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, Position};

    fn mode() -> SnakeMode {
        SnakeMode::with_engine(
            GameEngine::with_seed(GameConfig::default(), 17),
            Scoreboard::in_memory(),
        )
    }

    /// Start from the menu with the given selection
    fn playing(difficulty: Difficulty, game_mode: Mode) -> SnakeMode {
        let mut mode = mode();
        mode.menu = MenuSelection::new(difficulty, game_mode);
        mode.handle_action(KeyAction::Confirm);
        mode.state.food = Position::new(0, 0);
        mode
    }

    /// Run the snake into the right edge
    fn crash(mode: &mut SnakeMode) {
        for _ in 0..mode.state.grid_width {
            mode.tick();
        }
    }

    #[test]
    fn test_starts_in_menu() {
        let mode = mode();
        assert_eq!(mode.screen(), Screen::Menu);
        assert!(!mode.should_quit());
    }

    #[test]
    fn test_menu_selection_starts_session() {
        let mut mode = mode();
        mode.handle_action(KeyAction::Turn(Direction::Down));
        mode.handle_action(KeyAction::Turn(Direction::Right));
        mode.handle_action(KeyAction::Confirm);

        assert_eq!(mode.screen(), Screen::Playing);
        assert_eq!(mode.state().difficulty, Difficulty::Hard);
        assert_eq!(mode.state().mode, Mode::Walls);
        assert!(!mode.state().walls.is_empty());
        assert_eq!(mode.tick_interval(), Difficulty::Hard.tick_interval());
    }

    #[test]
    fn test_menu_escape_quits() {
        let mut mode = mode();
        mode.handle_action(KeyAction::Back);
        assert!(mode.should_quit());
    }

    #[test]
    fn test_ticks_do_nothing_in_menu() {
        let mut mode = mode();
        let head = mode.state().snake.head();
        mode.tick();
        assert_eq!(mode.state().snake.head(), head);
    }

    #[test]
    fn test_pause_skips_ticks_but_queues_turns() {
        let mut mode = playing(Difficulty::Normal, Mode::Classic);
        let head = mode.state().snake.head();

        mode.handle_action(KeyAction::TogglePause);
        assert_eq!(mode.screen(), Screen::Paused);
        mode.tick();
        assert_eq!(mode.state().snake.head(), head);

        mode.handle_action(KeyAction::Turn(Direction::Left));
        assert_eq!(mode.state().snake.next_direction, Direction::Right);
        mode.handle_action(KeyAction::Turn(Direction::Down));
        assert_eq!(mode.state().snake.next_direction, Direction::Down);

        mode.handle_action(KeyAction::TogglePause);
        assert_eq!(mode.screen(), Screen::Playing);
        mode.tick();
        assert_eq!(mode.state().snake.head(), head.moved_by(0, 1));
    }

    #[test]
    fn test_collision_enters_game_over_and_records() {
        let mut mode = playing(Difficulty::Easy, Mode::Classic);
        mode.state.score = 30;

        crash(&mut mode);

        assert_eq!(mode.screen(), Screen::GameOver { new_best: true });
        assert_eq!(mode.scoreboard().get_best(Difficulty::Easy, Mode::Classic), 30);
    }

    #[test]
    fn test_lower_score_is_not_a_new_best() {
        let mut mode = playing(Difficulty::Easy, Mode::Classic);
        mode.state.score = 30;
        crash(&mut mode);

        mode.handle_action(KeyAction::Restart);
        mode.state.food = Position::new(0, 0);
        mode.state.score = 20;
        crash(&mut mode);

        assert_eq!(mode.screen(), Screen::GameOver { new_best: false });
        assert_eq!(mode.scoreboard().get_best(Difficulty::Easy, Mode::Classic), 30);
    }

    #[test]
    fn test_restart_keeps_variant_and_resets_score() {
        let mut mode = playing(Difficulty::Hard, Mode::Obstacles);
        mode.state.score = 90;
        crash(&mut mode);

        mode.handle_action(KeyAction::Restart);

        assert_eq!(mode.screen(), Screen::Playing);
        assert_eq!(mode.state().score, 0);
        assert_eq!(mode.state().level, 1);
        assert_eq!(mode.state().difficulty, Difficulty::Hard);
        assert_eq!(mode.state().mode, Mode::Obstacles);
        assert_eq!(mode.state().obstacles.len(), 2);
    }

    #[test]
    fn test_escape_returns_to_menu_with_last_choice() {
        let mut mode = playing(Difficulty::Easy, Mode::Extreme);

        mode.handle_action(KeyAction::Back);

        assert_eq!(mode.screen(), Screen::Menu);
        assert_eq!(mode.menu().difficulty(), Difficulty::Easy);
        assert_eq!(mode.menu().mode(), Mode::Extreme);
        assert!(!mode.should_quit());
    }

    #[test]
    fn test_quit_only_from_menu_or_game_over() {
        let mut mode = playing(Difficulty::Normal, Mode::Classic);
        mode.handle_action(KeyAction::Quit);
        assert!(!mode.should_quit());

        crash(&mut mode);
        mode.handle_action(KeyAction::Quit);
        assert!(mode.should_quit());
    }

    #[test]
    fn test_interrupt_quits_anywhere() {
        let mut mode = playing(Difficulty::Normal, Mode::Classic);
        mode.handle_action(KeyAction::TogglePause);
        mode.handle_action(KeyAction::Interrupt);
        assert!(mode.should_quit());
    }

    #[test]
    fn test_ticks_held_while_terminal_too_small() {
        let mut mode = playing(Difficulty::Normal, Mode::Classic);
        let head = mode.state().snake.head();

        mode.set_viewport(80, 24);
        assert!(!mode.viewport_fits());
        mode.tick();
        assert_eq!(mode.state().snake.head(), head);

        mode.handle_event(Event::Resize(120, 40));
        assert!(mode.viewport_fits());
        mode.tick();
        assert_eq!(mode.state().snake.head(), head.moved_by(1, 0));
    }
}
