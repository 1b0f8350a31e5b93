use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Rows reserved for the metrics panel under the preview
const METRICS_HEIGHT: u16 = 12;

/// Search panel layout
pub struct AppLayout {
    pub input_area: Rect,
    pub results_area: Rect,
    pub preview_area: Rect,
    pub metrics_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// - Search input: top 3 rows
    /// - Results list: 60% width (left)
    /// - Preview over metrics: 40% width (right)
    /// - Status bar: bottom row
    pub fn new(area: Rect) -> Self {
        let vertical_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Input box
                Constraint::Min(3),    // Main area
                Constraint::Length(1), // Status bar
            ])
            .split(area);

        let horizontal_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(vertical_chunks[1]);

        let side_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(METRICS_HEIGHT)])
            .split(horizontal_chunks[1]);

        Self {
            input_area: vertical_chunks[0],
            results_area: horizontal_chunks[0],
            preview_area: side_chunks[0],
            metrics_area: side_chunks[1],
            status_area: vertical_chunks[2],
        }
    }
}
