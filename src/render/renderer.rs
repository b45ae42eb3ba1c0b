use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::game::{Difficulty, GameState, Mode, Position};
use crate::metrics::GameMetrics;
use crate::modes::screen::{MenuSelection, Screen};
use crate::scoreboard::Scoreboard;

const HEADER_HEIGHT: u16 = 3;
const FOOTER_HEIGHT: u16 = 3;

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        screen: Screen,
        menu: &MenuSelection,
        state: &GameState,
        scoreboard: &Scoreboard,
        metrics: &GameMetrics,
    ) {
        match screen {
            Screen::Menu => self.render_menu(frame, menu, scoreboard),
            Screen::Playing | Screen::Paused | Screen::GameOver { .. } => {
                self.render_session(frame, screen, state, scoreboard, metrics)
            }
        }
    }

    fn render_session(
        &self,
        frame: &mut Frame,
        screen: Screen,
        state: &GameState,
        scoreboard: &Scoreboard,
        metrics: &GameMetrics,
    ) {
        if !Self::fits(frame.area(), state) {
            frame.render_widget(self.render_too_small(frame.area(), state), frame.area());
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(0), // Game area
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(frame.area());

        let best = scoreboard.get_best(state.difficulty, state.mode);
        frame.render_widget(self.render_stats(state, best, metrics), chunks[0]);

        let (grid_width, grid_height) = grid_size(state);
        let game_area = centered(chunks[1], grid_width, grid_height);

        match screen {
            Screen::GameOver { new_best } => {
                frame.render_widget(self.render_game_over(state, new_best), game_area);
            }
            _ => {
                frame.render_widget(self.render_grid(state), game_area);
                if screen == Screen::Paused {
                    let overlay = centered(game_area, 20, 3);
                    frame.render_widget(Clear, overlay);
                    frame.render_widget(self.render_paused(), overlay);
                }
            }
        }

        frame.render_widget(self.render_controls(), chunks[2]);
    }

    /// Terminal size needed to draw a session on this grid
    pub fn required_size(state: &GameState) -> (u16, u16) {
        let (grid_width, grid_height) = grid_size(state);
        (grid_width, grid_height.saturating_add(HEADER_HEIGHT + FOOTER_HEIGHT))
    }

    pub fn fits(area: Rect, state: &GameState) -> bool {
        let (width, height) = Self::required_size(state);
        area.width >= width && area.height >= height
    }

    fn render_too_small(&self, area: Rect, state: &GameState) -> Paragraph<'_> {
        let (width, height) = Self::required_size(state);
        let text = vec![
            Line::from(Span::styled(
                "Terminal too small",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(format!("need {}x{}, have {}x{}", width, height, area.width, area.height)),
            Line::from("Resize the terminal or pass a smaller --width/--height"),
            Line::from("ESC - Menu"),
        ];

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
    }

    fn render_grid(&self, state: &GameState) -> Paragraph<'_> {
        let mut lines = Vec::with_capacity(state.grid_height);

        for y in 0..state.grid_height {
            let mut spans = Vec::with_capacity(state.grid_width);

            for x in 0..state.grid_width {
                let pos = Position::new(x as i32, y as i32);

                let cell = if pos == state.snake.head() {
                    Span::styled(
                        "■ ",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if state.snake.contains(pos) {
                    Span::styled("□ ", Style::default().fg(Color::Green))
                } else if pos == state.food {
                    Span::styled(
                        "O ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                } else if state.is_wall(pos) {
                    Span::styled("██", Style::default().fg(Color::Blue))
                } else if state.is_obstacle(pos) {
                    Span::styled("▓▓", Style::default().fg(Color::Magenta))
                } else {
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::White))
                .title(format!(" Snake - {} / {} ", state.difficulty, state.mode)),
        )
    }

    fn render_stats(&self, state: &GameState, best: u32, metrics: &GameMetrics) -> Paragraph<'_> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let text = vec![
            Line::from(vec![
                Span::styled("Score: ", label),
                Span::styled(state.score.to_string(), value.add_modifier(Modifier::BOLD)),
                Span::raw("    "),
                Span::styled("Level: ", label),
                Span::styled(state.level.to_string(), value),
                Span::raw("    "),
                Span::styled("Progress: ", label),
                Span::styled(
                    format!("{}/{}", state.food_eaten, state.food_for_next_level),
                    value,
                ),
                Span::raw("    "),
                Span::styled("Time: ", label),
                Span::styled(metrics.format_time(), value),
            ]),
            Line::from(vec![
                Span::styled("Difficulty: ", label),
                Span::styled(state.difficulty.name(), value),
                Span::raw("    "),
                Span::styled("Mode: ", label),
                Span::styled(state.mode.name(), value),
                Span::raw("    "),
                Span::styled("High Score: ", label),
                Span::styled(best.to_string(), value),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_paused(&self) -> Paragraph<'_> {
        Paragraph::new(Line::from(Span::styled(
            "PAUSED",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL))
    }

    fn render_game_over(&self, state: &GameState, new_best: bool) -> Paragraph<'_> {
        let mut text = vec![Line::from("")];

        if new_best {
            text.push(Line::from(Span::styled(
                "NEW HIGH SCORE!",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )));
        }

        text.extend([
            Line::from(Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    state.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("Level Reached: ", Style::default().fg(Color::Yellow)),
                Span::styled(state.level.to_string(), Style::default().fg(Color::White)),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to restart, ", Style::default().fg(Color::Gray)),
                Span::styled("ESC", Style::default().fg(Color::Cyan)),
                Span::styled(" for menu or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ]);

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("SPACE", Style::default().fg(Color::Cyan)),
            Span::raw(" pause | "),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" restart | "),
            Span::styled("ESC", Style::default().fg(Color::Red)),
            Span::raw(" menu"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_menu(&self, frame: &mut Frame, menu: &MenuSelection, scoreboard: &Scoreboard) {
        let selected = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);
        let normal = Style::default().fg(Color::White);
        let heading = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);

        let mut text = vec![
            Line::from(Span::styled(
                "SNAKE GAME - ADVANCED EDITION",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled("Difficulty (UP/DOWN):", heading)),
        ];

        for difficulty in Difficulty::ALL {
            let is_selected = difficulty == menu.difficulty();
            let style = if is_selected { selected } else { normal };
            text.push(Line::from(Span::styled(
                marked(difficulty.name(), is_selected),
                style,
            )));
        }

        text.push(Line::from(""));
        text.push(Line::from(Span::styled("Game Mode (LEFT/RIGHT):", heading)));
        for mode in Mode::ALL {
            let is_selected = mode == menu.mode();
            let style = if is_selected { selected } else { normal };
            text.push(Line::from(Span::styled(marked(mode.name(), is_selected), style)));
        }

        text.push(Line::from(""));
        text.push(Line::from(vec![
            Span::styled("High Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                scoreboard.get_best(menu.difficulty(), menu.mode()).to_string(),
                normal,
            ),
        ]));
        text.push(Line::from(""));
        text.push(Line::from("ENTER - Start Game    ESC - Quit"));
        text.push(Line::from(""));
        for mode in Mode::ALL {
            let settings = mode.settings();
            text.push(Line::from(Span::styled(
                format!("{} - {}", settings.name, settings.description),
                Style::default().fg(Color::Gray),
            )));
        }

        let menu_widget = Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(" Menu "),
        );
        frame.render_widget(menu_widget, frame.area());
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Two terminal columns per cell, plus the border
fn grid_size(state: &GameState) -> (u16, u16) {
    let width = state.grid_width.saturating_mul(2).saturating_add(2);
    let height = state.grid_height.saturating_add(2);
    (
        u16::try_from(width).unwrap_or(u16::MAX),
        u16::try_from(height).unwrap_or(u16::MAX),
    )
}

fn marked(name: &str, is_selected: bool) -> String {
    if is_selected {
        format!("> {} <", name)
    } else {
        name.to_string()
    }
}

/// Rectangle of at most `width` x `height` centered inside `area`
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameConfig, GameEngine};
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(screen: Screen, state: &GameState, scoreboard: &Scoreboard) -> String {
        draw_sized(100, 45, screen, state, scoreboard)
    }

    fn draw_sized(
        width: u16,
        height: u16,
        screen: Screen,
        state: &GameState,
        scoreboard: &Scoreboard,
    ) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        let renderer = Renderer::new();
        let menu = MenuSelection::default();
        let metrics = GameMetrics::new();
        terminal
            .draw(|frame| renderer.render(frame, screen, &menu, state, scoreboard, &metrics))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn session(mode: Mode) -> GameState {
        GameEngine::with_seed(GameConfig::default(), 5).reset(Difficulty::Normal, mode)
    }

    #[test]
    fn test_centered_clamps_to_area() {
        let area = Rect::new(0, 0, 10, 10);
        assert_eq!(centered(area, 4, 2), Rect::new(3, 4, 4, 2));
        assert_eq!(centered(area, 40, 40), area);
    }

    #[test]
    fn test_menu_shows_choices_and_best() {
        let mut scoreboard = Scoreboard::in_memory();
        scoreboard.record_score(Difficulty::Normal, Mode::Classic, 345);

        let screen = draw(Screen::Menu, &session(Mode::Classic), &scoreboard);

        assert!(screen.contains("> Normal <"));
        assert!(screen.contains("> Classic <"));
        assert!(screen.contains("Extreme"));
        assert!(screen.contains("345"));
    }

    #[test]
    fn test_playing_shows_hud_and_walls() {
        let screen = draw(Screen::Playing, &session(Mode::Walls), &Scoreboard::in_memory());

        assert!(screen.contains("Score: 0"));
        assert!(screen.contains("Progress: 0/5"));
        assert!(screen.contains("Mode: Walls"));
        assert!(screen.contains("██"));
        assert!(screen.contains("■"));
        assert!(!screen.contains("PAUSED"));
    }

    #[test]
    fn test_paused_overlay() {
        let screen = draw(Screen::Paused, &session(Mode::Classic), &Scoreboard::in_memory());
        assert!(screen.contains("PAUSED"));
    }

    #[test]
    fn test_game_over_mentions_new_best() {
        let state = session(Mode::Classic);
        let screen = draw(Screen::GameOver { new_best: true }, &state, &Scoreboard::in_memory());
        assert!(screen.contains("GAME OVER"));
        assert!(screen.contains("NEW HIGH SCORE!"));

        let screen = draw(Screen::GameOver { new_best: false }, &state, &Scoreboard::in_memory());
        assert!(!screen.contains("NEW HIGH SCORE!"));
    }

    #[test]
    fn test_required_size_for_default_grid() {
        let state = session(Mode::Classic);
        assert_eq!(Renderer::required_size(&state), (82, 38));
        assert!(!Renderer::fits(Rect::new(0, 0, 80, 24), &state));
        assert!(Renderer::fits(Rect::new(0, 0, 82, 38), &state));
    }

    #[test]
    fn test_small_terminal_shows_size_hint() {
        let state = session(Mode::Walls);
        let screen = draw_sized(80, 24, Screen::Playing, &state, &Scoreboard::in_memory());

        assert!(screen.contains("Terminal too small"));
        assert!(screen.contains("need 82x38, have 80x24"));
        assert!(!screen.contains("██"));
    }

    #[test]
    fn test_small_grid_fits_small_terminal() {
        let state = GameEngine::with_seed(GameConfig::new(20, 15), 5)
            .reset(Difficulty::Easy, Mode::Classic);
        let screen = draw_sized(80, 24, Screen::Playing, &state, &Scoreboard::in_memory());

        assert!(!screen.contains("Terminal too small"));
        assert!(screen.contains("Score: 0"));
    }
}
