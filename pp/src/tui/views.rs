//! TUI views and rendering
//!
//! All rendering logic is contained here. The views module is responsible
//! for drawing the UI based on AppState, but never modifies state.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use tracing::trace;

use super::state::{AppState, FormRow, InteractionMode};
use crate::domain::{ACCEPTED_EXTENSIONS, PantryOption};
use crate::llm::MODEL;
use crate::render::{MealCard, cards};

mod colors {
    use ratatui::style::Color;

    pub const HEADER: Color = Color::Rgb(0, 255, 255); // Cyan
    pub const KEYBIND: Color = Color::Rgb(0, 255, 255); // Cyan
    pub const SELECTED_BG: Color = Color::Rgb(40, 40, 40);
    pub const ENABLED: Color = Color::Rgb(0, 255, 127); // Spring green
    pub const LOADING: Color = Color::Rgb(255, 215, 0); // Gold
    pub const ERROR: Color = Color::Rgb(220, 20, 60); // Crimson
    pub const MEAL_TYPE: Color = Color::Rgb(100, 149, 237); // Cornflower blue
    pub const SHOPPING: Color = Color::Rgb(255, 165, 0); // Orange
    pub const DIM: Color = Color::DarkGray;
}

/// Main render function
pub fn render(state: &AppState, frame: &mut Frame) {
    trace!(?state.interaction_mode, "render: called");
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    render_header(frame, chunks[0]);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(44), Constraint::Min(0)])
        .split(chunks[1]);

    render_form(state, frame, panes[0]);
    render_results(state, frame, panes[1]);
    render_footer(state, frame, chunks[2]);

    if state.interaction_mode == InteractionMode::Help {
        render_help_overlay(frame, frame.area());
    }
}

fn render_header(frame: &mut Frame, area: Rect) {
    let line = Line::from(vec![
        Span::styled(
            " PantryPlan ",
            Style::default().fg(colors::HEADER).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" model: {}", MODEL), Style::default().fg(colors::DIM)),
    ]);
    frame.render_widget(Paragraph::new(line).block(Block::default().borders(Borders::ALL)), area);
}

/// Render the form pane
fn render_form(state: &AppState, frame: &mut Frame, area: Rect) {
    trace!(selected_row = state.selected_row, "render_form: called");
    let planner = &state.planner;
    let form = planner.form();
    let read_only = planner.is_loading();

    let mut lines = Vec::with_capacity(FormRow::ALL.len() + 2);
    for (i, row) in FormRow::ALL.iter().enumerate() {
        if *row == FormRow::Generate {
            lines.push(Line::from(""));
        }
        let value: Span = match row {
            FormRow::File => match &form.file {
                Some(file) => Span::raw(file.display_name()),
                None => Span::styled(
                    format!("(none) {}", ACCEPTED_EXTENSIONS.join(" ")),
                    Style::default().fg(colors::DIM),
                ),
            },
            FormRow::Diet => option_span(form.diet.map(|d| d.name())),
            FormRow::UserType => option_span(form.user_type.map(|u| u.name())),
            FormRow::People => Span::raw(format!("< {} >", form.people)),
            FormRow::Meal(meal) => {
                let mark = if form.meal_times.is_selected(*meal) { "[x]" } else { "[ ]" };
                Span::raw(format!("{} {}", mark, meal.name()))
            }
            FormRow::PantryOption => Span::raw(match form.pantry_option {
                PantryOption::PantryOnly => "< pantry only >",
                PantryOption::AllowNew => "< allow new + shopping list >",
            }),
            FormRow::Generate => {
                let style = if planner.can_submit() {
                    Style::default().fg(colors::ENABLED).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(colors::DIM)
                };
                Span::styled("[ Generate ]", style)
            }
        };

        let selected = i == state.selected_row;
        let marker = if selected { "> " } else { "  " };
        let label = match row {
            FormRow::Generate => String::new(),
            _ => format!("{:<13}", row.label()),
        };

        let mut line = Line::from(vec![
            Span::styled(marker, Style::default().fg(colors::KEYBIND)),
            Span::styled(label, Style::default().add_modifier(Modifier::BOLD)),
            value,
        ]);
        if selected {
            line = line.style(Style::default().bg(colors::SELECTED_BG));
        }
        if read_only {
            line = line.patch_style(Style::default().add_modifier(Modifier::DIM));
        }
        lines.push(line);
    }

    let form_widget = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Planner "));
    frame.render_widget(form_widget, area);
}

fn option_span(name: Option<&'static str>) -> Span<'static> {
    match name {
        Some(name) => Span::raw(format!("< {} >", name)),
        None => Span::styled("< select >", Style::default().fg(colors::DIM)),
    }
}

/// Render the results pane: loading, error or meal cards
fn render_results(state: &AppState, frame: &mut Frame, area: Rect) {
    let planner = &state.planner;
    let block = Block::default().borders(Borders::ALL).title(" Meal plan ");

    if planner.is_loading() {
        let secs = state.loading_elapsed_secs();
        let line = Line::from(vec![
            Span::styled(
                format!("{}...", state.loading_word),
                Style::default().fg(colors::LOADING).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" {}", format_elapsed(secs)), Style::default().fg(colors::DIM)),
        ]);
        frame.render_widget(Paragraph::new(line).block(block), area);
        return;
    }

    if let Some(error) = planner.error() {
        let para = Paragraph::new(Span::styled(error.to_string(), Style::default().fg(colors::ERROR)))
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(para, area);
        return;
    }

    let Some(meals) = planner.meals() else {
        let hint = Paragraph::new("Fill in the form and press g to generate a meal plan.")
            .style(Style::default().fg(colors::DIM))
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(hint, area);
        return;
    };

    if meals.is_empty() {
        frame.render_widget(Paragraph::new("No meals returned.").block(block), area);
        return;
    }

    let mut lines = Vec::new();
    for card in cards(meals) {
        card_lines(&card, &mut lines);
    }

    let para = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((state.results_scroll, 0));
    frame.render_widget(para, area);
}

fn card_lines<'a>(card: &MealCard<'a>, lines: &mut Vec<Line<'a>>) {
    lines.push(Line::from(Span::styled(
        card.header(),
        Style::default().fg(colors::MEAL_TYPE).add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(Span::styled(
        card.recipe_name,
        Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    )));

    if let Some(items) = card.shopping_list {
        lines.push(Line::from(Span::styled("Shopping list", Style::default().fg(colors::SHOPPING))));
        for item in items {
            lines.push(Line::from(format!("  - {}", item)));
        }
    }

    lines.push(Line::from(Span::styled("Ingredients", Style::default().fg(colors::DIM))));
    for item in card.ingredients {
        lines.push(Line::from(format!("  - {}", item)));
    }

    lines.push(Line::from(Span::styled("Instructions", Style::default().fg(colors::DIM))));
    for text in card.instructions.lines() {
        lines.push(Line::from(format!("  {}", text)));
    }
    lines.push(Line::from(""));
}

fn render_footer(state: &AppState, frame: &mut Frame, area: Rect) {
    trace!(?state.interaction_mode, "render_footer: called");
    let content = match &state.interaction_mode {
        InteractionMode::FileInput(text) => Line::from(vec![
            Span::styled(
                "Pantry file: ",
                Style::default().fg(colors::KEYBIND).add_modifier(Modifier::BOLD),
            ),
            Span::raw(text.as_str()),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
            Span::styled("  (Enter to select, Esc to cancel)", Style::default().fg(colors::DIM)),
        ]),
        _ => {
            let keybinds = [
                ("[↑↓]", "Move"),
                ("[←→]", "Change"),
                ("[Space]", "Toggle"),
                ("[g]", "Generate"),
                ("[?]", "Help"),
                ("[q]", "Quit"),
            ];
            let mut spans = vec![Span::raw(" ")];
            for (key, action) in keybinds {
                spans.push(Span::styled(
                    key,
                    Style::default().fg(colors::KEYBIND).add_modifier(Modifier::BOLD),
                ));
                spans.push(Span::raw(format!(" {} ", action)));
            }
            Line::from(spans)
        }
    };

    let footer = Paragraph::new(content).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

/// Render help overlay
fn render_help_overlay(frame: &mut Frame, area: Rect) {
    trace!("render_help_overlay: called");
    let popup_area = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
                .fg(colors::HEADER),
        )]),
        Line::from(""),
        Line::from(vec![Span::styled("Form", Style::default().add_modifier(Modifier::BOLD))]),
        key_line("j/↓", "Move down"),
        key_line("k/↑", "Move up"),
        key_line("h/l ←/→", "Change diet, user type or people"),
        key_line("Space", "Toggle meal time or ingredient policy"),
        key_line("Enter", "Edit file path / toggle / generate"),
        Line::from(""),
        Line::from(vec![Span::styled("Results", Style::default().add_modifier(Modifier::BOLD))]),
        key_line("g", "Generate meal plan"),
        key_line("PgUp/PgDn", "Scroll meal cards"),
        Line::from(""),
        Line::from(vec![Span::styled("Global", Style::default().add_modifier(Modifier::BOLD))]),
        key_line("?", "Toggle help"),
        key_line("q/Esc", "Quit"),
        key_line("Ctrl+C", "Force quit"),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help (? to close) ")
                .style(Style::default().bg(Color::Black)),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(help, popup_area);
}

/// Helper to create a key binding line
fn key_line<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("{:<12}", key), Style::default().fg(colors::KEYBIND)),
        Span::raw(desc),
    ])
}

/// Helper to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Format elapsed seconds for display (e.g., "45s", "1m 15s")
fn format_elapsed(secs: u64) -> String {
    if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}s", secs)
    }
}
