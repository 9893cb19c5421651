use ratatui::style::{Color, Modifier, Style};

pub(crate) const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

pub(crate) const TITLE_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const MUTED_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

pub(crate) const STATUS_STYLE: Style = BASE_STYLE.fg(Color::LightCyan);

/// Applied to everything behind the open cart panel
pub(crate) const BACKDROP_STYLE: Style = Style::new().fg(Color::DarkGray);

pub(crate) mod storefront {
    use super::*;

    pub(crate) const HIGHLIGHT_STYLE: Style = BASE_STYLE
        .fg(Color::LightCyan)
        .add_modifier(Modifier::BOLD);

    pub(crate) const IN_CART_STYLE: Style = BASE_STYLE.fg(Color::Cyan);
}

pub(crate) mod sidebar {
    use super::*;

    pub(crate) const CART_BUTTON_STYLE: Style = Style::new()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD);

    pub(crate) const PANEL_BORDER_STYLE: Style = BASE_STYLE.fg(Color::Gray);

    pub(crate) const SEPARATOR_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

    pub(crate) const SUBTOTAL_STYLE: Style = BASE_STYLE
        .fg(Color::LightCyan)
        .add_modifier(Modifier::BOLD);

    pub(crate) const TOTAL_STYLE: Style = BASE_STYLE
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);

    pub(crate) const LABEL_STYLE: Style = BASE_STYLE.fg(Color::Gray);

    pub(crate) const FOCUSED_LABEL_STYLE: Style = BASE_STYLE
        .fg(Color::LightCyan)
        .add_modifier(Modifier::BOLD);

    pub(crate) const INPUT_STYLE: Style = BASE_STYLE.add_modifier(Modifier::UNDERLINED);

    pub(crate) const PLACEHOLDER_STYLE: Style = MUTED_STYLE.add_modifier(Modifier::UNDERLINED);

    pub(crate) const DAY_STYLE: Style = BASE_STYLE;

    pub(crate) const DISABLED_DAY_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

    pub(crate) const SELECTED_DAY_STYLE: Style = Style::new()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD);

    /// Added on top of a day's style to show the keyboard cursor
    pub(crate) const CURSOR_MODIFIER: Modifier = Modifier::REVERSED;

    pub(crate) const NAV_STYLE: Style = BASE_STYLE.fg(Color::Gray);

    pub(crate) const PRIMARY_BUTTON_STYLE: Style = Style::new()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD);

    pub(crate) const OUTLINE_BUTTON_STYLE: Style = BASE_STYLE.fg(Color::Cyan);
}
