use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

use super::app::{MessageType, Panel, StatusMessage};
use super::layout::AppLayout;
use super::timestamps::format_timestamp;
use crate::gesture::PullToRefresh;
use crate::metrics::format_search_time;
use crate::models::{EnhancedRepository, SearchHistoryEntry};
use crate::search::{SearchSession, SearchStatus};
use crate::utils::terminal::{single_line, strip_ansi_codes};

const MUTED: Color = Color::Rgb(113, 113, 122);
const BRIGHT: Color = Color::Rgb(250, 250, 250);
const ACCENT: Color = Color::Rgb(16, 185, 129);
const ERROR: Color = Color::Rgb(239, 68, 68);
const BAR_BG: Color = Color::Rgb(24, 24, 27);

/// Spinner frames, one per 90 degrees of indicator rotation
const SPINNER: [char; 4] = ['◐', '◓', '◑', '◒'];
/// Languages listed in the metrics panel
const TOP_LANGUAGES: usize = 5;

pub struct RenderState<'a> {
    pub session: &'a SearchSession,
    pub panel: Panel,
    pub gesture: &'a PullToRefresh,
    pub status_message: Option<&'a StatusMessage>,
}

/// Render the entire UI, returning the layout used so pointer input can be hit-tested
pub fn render_ui(frame: &mut Frame, state: &RenderState, list_state: &mut ListState) -> AppLayout {
    let layout = AppLayout::new(frame.area());
    let selected = list_state.selected();

    render_input(frame, layout.input_area, state.session);

    match state.panel {
        Panel::Results => {
            let repositories = state.session.repositories();
            render_results_list(frame, layout.results_area, state, list_state);
            render_preview(frame, layout.preview_area, selected.and_then(|i| repositories.get(i)));
        }
        Panel::History => {
            let history = state.session.history();
            render_history_list(frame, layout.results_area, history, list_state);
            render_history_detail(frame, layout.preview_area, selected.and_then(|i| history.get(i)));
        }
    }

    render_metrics(frame, layout.metrics_area, state.session);
    render_status_bar(frame, layout.status_area, state);

    layout
}

fn panel_block(title: impl Into<Line<'static>>) -> Block<'static> {
    Block::default().borders(Borders::ALL).border_style(Style::default().fg(MUTED)).title(title)
}

fn label(text: &'static str) -> Span<'static> {
    Span::styled(text, Style::default().fg(MUTED))
}

fn item_style(selected: bool) -> Style {
    if selected {
        Style::default().fg(BRIGHT).bg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(MUTED)
    }
}

fn render_input(frame: &mut Frame, area: Rect, session: &SearchSession) {
    let query = session.query();
    let mut block = panel_block(format!(" Search ({}) ", session.mode()));

    // Inline validation once the user has typed something
    if !query.is_empty()
        && let Some(error) = session.validation().error
    {
        block = block.title_bottom(Line::styled(format!(" {} ", error), Style::default().fg(ERROR)));
    }

    let input = Paragraph::new(Line::from(vec![
        Span::styled("> ", Style::default().fg(ACCENT)),
        Span::styled(strip_ansi_codes(query), Style::default().fg(BRIGHT)),
    ]))
    .block(block);

    frame.render_widget(input, area);
}

/// Results title, replaced by pull-to-refresh feedback while a gesture is active
fn results_title(state: &RenderState) -> String {
    let gesture = state.gesture;
    let spinner = SPINNER[(gesture.indicator_rotation() / 90.0) as usize % SPINNER.len()];

    if gesture.is_refreshing() {
        format!(" {} Refreshing... ", spinner)
    } else if gesture.is_pulling() && gesture.is_triggered() {
        format!(" {} Release to refresh ", spinner)
    } else if gesture.is_pulling() && gesture.pull_distance() > 0.0 {
        format!(" {} Pull to refresh ({:.0}%) ", spinner, gesture.progress() * 100.0)
    } else if state.session.is_loading() {
        " Searching... ".to_string()
    } else {
        format!(" Results ({}) ", state.session.repositories().len())
    }
}

fn render_results_list(frame: &mut Frame, area: Rect, state: &RenderState, list_state: &mut ListState) {
    let selected = list_state.selected();
    let items: Vec<ListItem> = state
        .session
        .repositories()
        .iter()
        .enumerate()
        .map(|(idx, repo)| {
            let r = &repo.repository;
            let language = r.language.as_deref().unwrap_or("-");
            let content = format!(
                "{} | ★ {} | {} | {}%",
                single_line(&r.full_name, 40),
                r.stargazers_count,
                single_line(language, 16),
                repo.similarity.overall_similarity
            );
            ListItem::new(content).style(item_style(selected == Some(idx)))
        })
        .collect();

    let list = List::new(items).block(panel_block(results_title(state)));
    frame.render_stateful_widget(list, area, list_state);
}

fn render_preview(frame: &mut Frame, area: Rect, repo: Option<&EnhancedRepository>) {
    let content = if let Some(repo) = repo {
        let r = &repo.repository;
        let s = &repo.similarity;
        let mut lines = vec![
            Line::styled(strip_ansi_codes(&r.full_name), Style::default().fg(BRIGHT).add_modifier(Modifier::BOLD)),
            Line::from(""),
        ];

        if let Some(description) = r.description.as_deref().filter(|d| !d.trim().is_empty()) {
            lines.push(Line::from(strip_ansi_codes(description)));
            lines.push(Line::from(""));
        }

        lines.push(Line::from(vec![
            label("Stars: "),
            Span::raw(r.stargazers_count.to_string()),
            label("  Forks: "),
            Span::raw(r.forks_count.to_string()),
            label("  Issues: "),
            Span::raw(r.open_issues_count.to_string()),
        ]));
        lines.push(Line::from(vec![
            label("Language: "),
            Span::raw(strip_ansi_codes(r.language.as_deref().unwrap_or("-"))),
        ]));
        if let Some(license) = &r.license {
            lines.push(Line::from(vec![label("License: "), Span::raw(strip_ansi_codes(&license.name))]));
        }
        if !r.topics.is_empty() {
            lines.push(Line::from(vec![
                label("Topics: "),
                Span::raw(strip_ansi_codes(&r.topics.join(", "))),
            ]));
        }
        if let Some(updated) = &r.updated_at {
            lines.push(Line::from(vec![label("Updated: "), Span::raw(format_timestamp(updated))]));
        }
        if r.archived {
            lines.push(Line::styled("Archived", Style::default().fg(ERROR)));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(vec![label("URL: "), Span::raw(repo.download_urls.html.clone())]));
        lines.push(Line::from(vec![label("Zip: "), Span::raw(repo.download_urls.zip.clone())]));

        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            label("Similarity: "),
            Span::styled(format!("{}%", s.overall_similarity), Style::default().fg(ACCENT)),
        ]));
        for (name, score) in [
            ("  content ", s.content_similarity),
            ("  requirement ", s.requirement_similarity),
            ("  working ", s.working_similarity),
            ("  purpose ", s.purpose_similarity),
            ("  semantic ", s.semantic_similarity),
        ] {
            lines.push(Line::from(vec![label(name), Span::raw(format!("{}%", score))]));
        }

        Text::from(lines)
    } else {
        Text::from("No repository selected")
    };

    let paragraph =
        Paragraph::new(content).block(panel_block(" Preview ")).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_history_list(
    frame: &mut Frame,
    area: Rect,
    history: &[SearchHistoryEntry],
    list_state: &mut ListState,
) {
    let selected = list_state.selected();
    let items: Vec<ListItem> = history
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let content = format!(
                "{} | {} results | {} | {}",
                format_timestamp(&entry.timestamp),
                entry.result_count,
                entry.search_mode,
                single_line(&entry.query, 50)
            );
            ListItem::new(content).style(item_style(selected == Some(idx)))
        })
        .collect();

    let list = List::new(items).block(panel_block(format!(" History ({}) ", history.len())));
    frame.render_stateful_widget(list, area, list_state);
}

fn render_history_detail(frame: &mut Frame, area: Rect, entry: Option<&SearchHistoryEntry>) {
    let content = if let Some(entry) = entry {
        Text::from(vec![
            Line::from(vec![label("Query: "), Span::raw(strip_ansi_codes(&entry.query))]),
            Line::from(vec![label("Mode: "), Span::raw(entry.search_mode.to_string())]),
            Line::from(vec![label("Results: "), Span::raw(entry.result_count.to_string())]),
            Line::from(vec![
                label("Searched: "),
                Span::raw(entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()),
            ]),
            Line::from(vec![label("Id: "), Span::raw(entry.id.clone())]),
            Line::from(""),
            Line::styled("Enter: search again | Del: remove", Style::default().fg(MUTED)),
        ])
    } else {
        Text::from("No saved searches")
    };

    let paragraph = Paragraph::new(content).block(panel_block(" Details ")).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_metrics(frame: &mut Frame, area: Rect, session: &SearchSession) {
    let content = if let Some(metrics) = session.metrics() {
        let mut lines = vec![
            Line::from(vec![
                label("Repositories: "),
                Span::raw(metrics.total_repositories.to_string()),
                label("  Languages: "),
                Span::raw(metrics.unique_languages.to_string()),
            ]),
            Line::from(vec![
                label("Avg stars: "),
                Span::raw(metrics.average_stars.to_string()),
                label("  Avg forks: "),
                Span::raw(metrics.average_forks.to_string()),
            ]),
            Line::from(vec![
                label("Most popular: "),
                Span::raw(strip_ansi_codes(&metrics.most_popular_language)),
                label("  Time: "),
                Span::raw(format_search_time(metrics.search_time)),
            ]),
            Line::from(""),
        ];

        for stat in session.language_stats().iter().take(TOP_LANGUAGES) {
            lines.push(Line::from(vec![
                Span::raw(format!("{:<14}", single_line(&stat.language, 14))),
                Span::styled(format!("{:>3}% ", stat.percentage), Style::default().fg(ACCENT)),
                label("repos "),
                Span::raw(format!("{:<4}", stat.count)),
                label("★ "),
                Span::raw(stat.total_stars.to_string()),
            ]));
        }

        Text::from(lines)
    } else {
        Text::from("Run a search to see metrics")
    };

    let paragraph = Paragraph::new(content).block(panel_block(" Metrics "));
    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, area: Rect, state: &RenderState) {
    let bar = Style::default().fg(BRIGHT).bg(BAR_BG);

    let (status_text, style) = if let Some(message) = state.status_message {
        let color = match message.message_type {
            MessageType::Success => ACCENT,
            MessageType::Error => ERROR,
        };
        (format!(" {} ", message.text), bar.fg(color))
    } else if let SearchStatus::Failed(message) = state.session.status() {
        (format!(" [ERROR] {} | Ctrl+R: retry | Ctrl+C: quit ", message), bar.fg(ERROR))
    } else if state.session.is_loading() {
        (" Searching GitHub... | Esc: cancel | Ctrl+C: quit ".to_string(), bar)
    } else {
        let hints = match state.panel {
            Panel::Results => {
                "Enter: search | Ctrl+T: mode | Ctrl+Y: copy URL | Ctrl+K: clone URL | Ctrl+E: export | Tab: history"
            }
            Panel::History => "Enter: search again | Del: remove | Ctrl+D: clear all | Tab: results",
        };
        (format!(" [{}] {} | Ctrl+C: quit ", state.session.mode(), hints), bar)
    };

    frame.render_widget(Paragraph::new(status_text).style(style), area);
}
