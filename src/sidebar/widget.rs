use super::month::DAY_LABELS;
use super::{Field, SidebarState};
use crate::cart::{Cart, CartItem};
use crate::theme::{
    sidebar::{
        CART_BUTTON_STYLE, CURSOR_MODIFIER, DAY_STYLE, DISABLED_DAY_STYLE, FOCUSED_LABEL_STYLE,
        INPUT_STYLE, LABEL_STYLE, NAV_STYLE, OUTLINE_BUTTON_STYLE, PANEL_BORDER_STYLE,
        PLACEHOLDER_STYLE, PRIMARY_BUTTON_STYLE, SELECTED_DAY_STYLE, SEPARATOR_STYLE,
        SUBTOTAL_STYLE, TOTAL_STYLE,
    },
    BACKDROP_STYLE, BASE_STYLE, MUTED_STYLE, TITLE_STYLE,
};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Clear, Paragraph, StatefulWidget, Widget},
};
use time::Date;

/// Width of the open panel, including its border
const PANEL_WIDTH: u16 = 44;

/// Width available to the panel's content
const INNER_WIDTH: usize = 42;

/// The panel may take up at most this percentage of the screen's height
const PANEL_MAX_HEIGHT_PERCENT: u32 = 70;

/// Columns between the cart button and the right edge of the screen
const BUTTON_RIGHT_MARGIN: u16 = 2;

/// Lines between the cart button and the bottom of the screen
const BUTTON_BOTTOM_MARGIN: u16 = 1;

/// Lines between the top of the cart button and the bottom of the panel
const PANEL_GAP: u16 = 1;

/// Columns taken up by a single day in the calendar grid
const DAY_WIDTH: usize = 4;

/// Columns between adjacent days in the calendar grid
const DAY_GAP: &str = " ";

/// Indentation that centers the seven-day grid in the panel
const GRID_INDENT: usize = (INNER_WIDTH - (7 * DAY_WIDTH + 6)) / 2;

static EMPTY_CART_TEXT: &str =
    "Aún no has añadido ningún servicio. Selecciona uno para verlo aquí.";
static AVAILABILITY_TEXT: &str =
    "Agenda disponible de lunes a sábado, de 9:00 a 13:00 y de 16:00 a 20:00.";
static QUOTE_FOOTNOTE: &str = "* Los servicios marcados como “Presupuesto” se confirman en tienda según el estado del cabello y el tipo de servicio.";
static PREVIOUS_MONTH: &str = "← Anterior";
static NEXT_MONTH: &str = "Siguiente →";
static NAME_PLACEHOLDER: &str = "Tu nombre";
static TIME_PLACEHOLDER: &str = "Selecciona una hora";
static CONFIRM_BUTTON: &str = "[ Confirmar cita ]";
static CLEAR_BUTTON: &str = "[ Vaciar ]";
static CARET: &str = "▏";

/// The cart button in the bottom-right corner plus, when open, the panel
/// listing the cart and the appointment form.  The cart itself belongs to the
/// caller; the widget only reads it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct CartSidebar<'a> {
    cart: &'a Cart,
}

impl<'a> CartSidebar<'a> {
    pub(crate) fn new(cart: &'a Cart) -> CartSidebar<'a> {
        CartSidebar { cart }
    }

    fn button_text(&self) -> String {
        let count = self.cart.item_count();
        let mut parts = vec![String::from("🛒")];
        if count > 0 {
            parts.push(format!("{count} item(s)"));
        } else {
            parts.push(String::from("Carrito"));
        }
        let total = self.cart.total();
        if total > 0 {
            parts.push(format!("{total} €"));
        }
        format!(" {} ", parts.join(" "))
    }
}

impl StatefulWidget for CartSidebar<'_> {
    type State = SidebarState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        if area.is_empty() {
            return;
        }
        let label = self.button_text();
        let button = button_area(area, Span::raw(label.as_str()).width());
        if state.is_open() {
            buf.set_style(area, BACKDROP_STYLE);
            let content = PanelContent::build(self.cart, state);
            let panel = panel_area(area, button, content.lines.len());
            if !panel.is_empty() {
                content.render(panel, buf);
            }
        }
        Clear.render(button, buf);
        Paragraph::new(label)
            .style(CART_BUTTON_STYLE)
            .render(button, buf);
    }
}

fn button_area(area: Rect, text_width: usize) -> Rect {
    let width = u16::try_from(text_width)
        .unwrap_or(u16::MAX)
        .min(area.width);
    let x = area
        .right()
        .saturating_sub(width.saturating_add(BUTTON_RIGHT_MARGIN))
        .max(area.x);
    let y = area
        .bottom()
        .saturating_sub(1 + BUTTON_BOTTOM_MARGIN)
        .max(area.y);
    Rect {
        x,
        y,
        width,
        height: 1,
    }
}

// The panel sits above the button, right-aligned with it, and grows upwards
fn panel_area(area: Rect, button: Rect, content_lines: usize) -> Rect {
    let width = PANEL_WIDTH.min(area.width);
    let bottom = button.y.saturating_sub(PANEL_GAP).max(area.y);
    let available = bottom - area.y;
    let max_height = u16::try_from(u32::from(area.height) * PANEL_MAX_HEIGHT_PERCENT / 100)
        .unwrap_or(area.height);
    let height = u16::try_from(content_lines)
        .unwrap_or(u16::MAX)
        .saturating_add(2)
        .min(max_height)
        .min(available);
    let x = button.right().saturating_sub(width).max(area.x);
    Rect {
        x,
        y: bottom - height,
        width,
        height,
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct PanelContent {
    lines: Vec<Line<'static>>,
    // Index of the line that must be kept in view
    focus_line: usize,
}

impl PanelContent {
    fn build(cart: &Cart, state: &SidebarState) -> PanelContent {
        let mut content = PanelContent::default();
        if cart.is_empty() {
            content.push_wrapped(EMPTY_CART_TEXT, MUTED_STYLE);
            return content;
        }
        let focus = state.focus();
        for (i, item) in cart.items().iter().enumerate() {
            if i > 0 {
                content.push(separator());
            }
            content.push_item(item);
        }
        content.push(separator());
        content.push(justify(
            Span::styled("Total servicios:", TITLE_STYLE),
            Span::styled(format!("{} €", cart.total()), TOTAL_STYLE),
        ));
        content.push(Line::default());

        content.push_label("Nombre", focus == Field::Name);
        content.push_focusable(name_input(state), focus == Field::Name);
        content.push(Line::default());

        content.push_label("Fecha", focus == Field::Calendar);
        content.push(month_nav(state));
        content.push(day_labels());
        for week in state.month().weeks() {
            let has_cursor =
                focus == Field::Calendar && week.contains(&Some(state.day_cursor()));
            content.push_focusable(week_line(&week, state), has_cursor);
        }
        content.push_wrapped(AVAILABILITY_TEXT, MUTED_STYLE);
        content.push(Line::default());

        content.push_label("Hora", focus == Field::Time);
        content.push_focusable(time_select(state), focus == Field::Time);
        content.push(Line::default());

        content.push_focusable(
            buttons(cart, state),
            matches!(focus, Field::Confirm | Field::Clear),
        );
        content.push_wrapped(QUOTE_FOOTNOTE, MUTED_STYLE);
        content
    }

    fn push(&mut self, line: Line<'static>) {
        self.lines.push(line);
    }

    fn push_focusable(&mut self, line: Line<'static>, focused: bool) {
        if focused {
            self.focus_line = self.lines.len();
        }
        self.lines.push(line);
    }

    fn push_label(&mut self, label: &'static str, focused: bool) {
        let style = if focused {
            FOCUSED_LABEL_STYLE
        } else {
            LABEL_STYLE
        };
        self.push_focusable(Line::styled(label, style), focused);
    }

    fn push_wrapped(&mut self, text: &str, style: Style) {
        for ln in wrap_words(text, INNER_WIDTH) {
            self.lines.push(Line::styled(ln, style));
        }
    }

    fn push_item(&mut self, item: &CartItem) {
        let subtotal = if item.service.is_quoted() {
            String::from("-")
        } else {
            format!("{} €", item.subtotal())
        };
        self.push(justify(
            Span::styled(item.service.name.clone(), TITLE_STYLE),
            Span::styled(subtotal, SUBTOTAL_STYLE),
        ));
        self.push(Line::styled(
            format!("{} × {}", item.quantity, item.service.price_label()),
            MUTED_STYLE,
        ));
    }

    fn render(self, area: Rect, buf: &mut Buffer) {
        let visible = usize::from(area.height.saturating_sub(2));
        // Scroll just far enough for the focused line to be on screen
        let offset = u16::try_from((self.focus_line + 1).saturating_sub(visible)).unwrap_or(0);
        let block = Block::bordered()
            .title(" Carrito ")
            .title_style(TITLE_STYLE)
            .border_style(PANEL_BORDER_STYLE);
        Clear.render(area, buf);
        Paragraph::new(Text::from(self.lines))
            .block(block)
            .style(BASE_STYLE)
            .scroll((offset, 0))
            .render(area, buf);
    }
}

fn separator() -> Line<'static> {
    Line::styled("─".repeat(INNER_WIDTH), SEPARATOR_STYLE)
}

// Put `left` at the start of the line and `right` at its end
fn justify(left: Span<'static>, right: Span<'static>) -> Line<'static> {
    let pad = INNER_WIDTH
        .saturating_sub(left.width() + right.width())
        .max(1);
    Line::from(vec![left, Span::raw(" ".repeat(pad)), right])
}

fn pad_to(spans: &mut Vec<Span<'static>>, style: Style) {
    let width = spans.iter().map(Span::width).sum::<usize>();
    if let Some(pad) = INNER_WIDTH.checked_sub(width).filter(|&p| p > 0) {
        spans.push(Span::styled(" ".repeat(pad), style));
    }
}

fn name_input(state: &SidebarState) -> Line<'static> {
    let focused = state.focus() == Field::Name;
    let mut spans = Vec::new();
    if state.name().is_empty() {
        if focused {
            spans.push(Span::styled(CARET, INPUT_STYLE));
        }
        spans.push(Span::styled(NAME_PLACEHOLDER, PLACEHOLDER_STYLE));
    } else {
        // Leave room for the caret
        let shown = tail(state.name(), INNER_WIDTH - 1);
        spans.push(Span::styled(shown, INPUT_STYLE));
        if focused {
            spans.push(Span::styled(CARET, INPUT_STYLE));
        }
    }
    pad_to(&mut spans, INPUT_STYLE);
    Line::from(spans)
}

// The end of `text`, cut down to `width` characters with a leading ellipsis
fn tail(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len <= width {
        text.to_owned()
    } else {
        std::iter::once('…')
            .chain(text.chars().skip(len + 1 - width))
            .collect()
    }
}

fn month_nav(state: &SidebarState) -> Line<'static> {
    let previous_style = if state.can_go_back() {
        NAV_STYLE
    } else {
        MUTED_STYLE
    };
    let previous = Span::styled(PREVIOUS_MONTH, previous_style);
    let next = Span::styled(NEXT_MONTH, NAV_STYLE);
    let label = Span::styled(state.month().label(), TITLE_STYLE);
    let middle = INNER_WIDTH.saturating_sub(previous.width() + next.width());
    let left_pad = middle.saturating_sub(label.width()) / 2;
    let right_pad = middle
        .saturating_sub(label.width() + left_pad)
        .max(1);
    Line::from(vec![
        previous,
        Span::raw(" ".repeat(left_pad.max(1))),
        label,
        Span::raw(" ".repeat(right_pad)),
        next,
    ])
}

fn day_labels() -> Line<'static> {
    let mut spans = vec![Span::raw(" ".repeat(GRID_INDENT))];
    for (i, label) in DAY_LABELS.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(DAY_GAP));
        }
        spans.push(Span::styled(format!(" {label:>2} "), LABEL_STYLE));
    }
    Line::from(spans)
}

fn week_line(week: &[Option<Date>], state: &SidebarState) -> Line<'static> {
    let mut spans = vec![Span::raw(" ".repeat(GRID_INDENT))];
    for (i, cell) in week.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(DAY_GAP));
        }
        spans.push(match *cell {
            Some(date) => Span::styled(format!(" {:>2} ", date.day()), day_style(date, state)),
            None => Span::raw(" ".repeat(DAY_WIDTH)),
        });
    }
    Line::from(spans)
}

fn day_style(date: Date, state: &SidebarState) -> Style {
    let style = if state.is_disabled_date(date) {
        DISABLED_DAY_STYLE
    } else if state.date() == Some(date) {
        SELECTED_DAY_STYLE
    } else {
        DAY_STYLE
    };
    if state.focus() == Field::Calendar && state.day_cursor() == date {
        style.add_modifier(CURSOR_MODIFIER)
    } else {
        style
    }
}

fn time_select(state: &SidebarState) -> Line<'static> {
    let value = match state.time() {
        Some(t) => Span::styled(t.to_string(), INPUT_STYLE),
        None => Span::styled(TIME_PLACEHOLDER, PLACEHOLDER_STYLE),
    };
    justify(value, Span::styled("▾", LABEL_STYLE))
}

fn buttons(cart: &Cart, state: &SidebarState) -> Line<'static> {
    let mut confirm = if state.can_confirm(cart) {
        PRIMARY_BUTTON_STYLE
    } else {
        MUTED_STYLE
    };
    let mut clear = OUTLINE_BUTTON_STYLE;
    match state.focus() {
        Field::Confirm => confirm = confirm.add_modifier(CURSOR_MODIFIER),
        Field::Clear => clear = clear.add_modifier(CURSOR_MODIFIER),
        _ => (),
    }
    Line::from(vec![
        Span::styled(CONFIRM_BUTTON, confirm),
        Span::raw(" "),
        Span::styled(CLEAR_BUTTON, clear),
    ])
}

/// Greedily break `text` into lines of at most `width` characters.  Words
/// longer than `width` are left on a line of their own.
fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
