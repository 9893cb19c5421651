use crate::cart::Cart;
use crate::catalog::Catalog;
use crate::help::Help;
use crate::sidebar::{Booking, CartSidebar, SidebarInput, SidebarOutput, SidebarState};
use crate::storefront::Storefront;
use crate::theme::{BASE_STYLE, MUTED_STYLE, STATUS_STYLE, TITLE_STYLE};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, read};
use ratatui::{
    Terminal,
    backend::Backend,
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{ListState, StatefulWidget, Widget},
};
use std::io::{self, Write};
use time::{Date, OffsetDateTime};

static TITLE: &str = " Reserva tu cita";
static HINT: &str = " ENTER añadir · c carrito · ? ayuda · q salir";

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct App {
    catalog: Catalog,
    cart: Cart,
    selection: ListState,
    sidebar: SidebarState,
    bookings: Vec<Booking>,
    status: Option<String>,
    state: AppState,
    // Whether "today" follows the local clock
    live_date: bool,
}

impl App {
    pub(crate) fn new(catalog: Catalog, today: Date) -> App {
        App {
            catalog,
            cart: Cart::new(),
            selection: ListState::default().with_selected(Some(0)),
            sidebar: SidebarState::new(today),
            bookings: Vec::new(),
            status: None,
            state: AppState::Browsing,
            live_date: false,
        }
    }

    /// Keep the calendar's notion of "today" in step with the local clock,
    /// so that a session left open past midnight stops offering yesterday
    pub(crate) fn with_live_date(mut self) -> App {
        self.live_date = true;
        self
    }

    /// Run until the user quits and return the appointments confirmed along
    /// the way
    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<Vec<Booking>> {
        while !self.quitting() {
            self.draw(&mut terminal)?;
            self.handle_input()?;
        }
        Ok(self.bookings)
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| frame.render_widget(self, frame.area()))?;
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if let Some(KeyEvent {
            code, modifiers, ..
        }) = read()?.as_key_press_event()
        {
            self.refresh_today();
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.state = AppState::Quitting;
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                self.beep()?;
            }
        }
        // else: Redraw on resize, and we might as well redraw on other stuff
        // too
        Ok(())
    }

    // Returns `false` if the user pressed an invalid key
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match self.state {
            AppState::Browsing if self.sidebar.is_open() => self.handle_sidebar_key(key),
            AppState::Browsing => match key {
                KeyCode::Char('j') | KeyCode::Down => self.select_next(),
                KeyCode::Char('k') | KeyCode::Up => self.select_previous(),
                KeyCode::Enter | KeyCode::Char('+' | 'a') => self.add_selected(),
                KeyCode::Char('-' | 'x') => self.remove_selected(),
                KeyCode::Char('c') | KeyCode::Tab => {
                    self.sidebar.toggle();
                    tracing::debug!("Opened cart");
                    true
                }
                KeyCode::Char('?') => {
                    self.state = AppState::Helping;
                    true
                }
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.state = AppState::Quitting;
                    true
                }
                _ => false,
            },
            AppState::Helping => {
                self.state = AppState::Browsing;
                true
            }
            AppState::Quitting => false,
        }
    }

    fn handle_sidebar_key(&mut self, key: KeyCode) -> bool {
        let input = match key {
            KeyCode::Esc => SidebarInput::Close,
            KeyCode::Tab => SidebarInput::NextField,
            KeyCode::BackTab => SidebarInput::PrevField,
            KeyCode::Enter => SidebarInput::Enter,
            KeyCode::Backspace | KeyCode::Delete => SidebarInput::Backspace,
            KeyCode::Left => SidebarInput::Left,
            KeyCode::Right => SidebarInput::Right,
            KeyCode::Up => SidebarInput::Up,
            KeyCode::Down => SidebarInput::Down,
            KeyCode::PageUp => SidebarInput::PreviousMonth,
            KeyCode::PageDown => SidebarInput::NextMonth,
            KeyCode::Char(c) => SidebarInput::Char(c),
            _ => return false,
        };
        match self.sidebar.handle_input(input, &self.cart) {
            SidebarOutput::Ok => true,
            SidebarOutput::Invalid => false,
            SidebarOutput::Closed => {
                tracing::debug!("Closed cart");
                true
            }
            SidebarOutput::Clear => {
                self.clear_cart();
                true
            }
            SidebarOutput::Confirm(booking) => {
                self.record_booking(booking);
                true
            }
        }
    }

    fn refresh_today(&mut self) {
        if !self.live_date {
            return;
        }
        match OffsetDateTime::now_local() {
            Ok(now) => self.sidebar.set_today(now.date()),
            Err(e) => tracing::warn!("Failed to determine local date: {e}"),
        }
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }

    fn select_next(&mut self) -> bool {
        let i = self.selection.selected().unwrap_or(0);
        if i + 1 < self.catalog.len() {
            self.selection.select(Some(i + 1));
            true
        } else {
            false
        }
    }

    fn select_previous(&mut self) -> bool {
        match self.selection.selected() {
            Some(i) if i > 0 => {
                self.selection.select(Some(i - 1));
                true
            }
            _ => false,
        }
    }

    fn add_selected(&mut self) -> bool {
        let Some(service) = self
            .selection
            .selected()
            .and_then(|i| self.catalog.get(i))
        else {
            return false;
        };
        self.cart.add(service);
        tracing::info!(
            service = %service.id,
            quantity = self.cart.quantity_of(&service.id),
            total = self.cart.total(),
            "Added service to cart"
        );
        self.status = Some(format!("Añadido: {}", service.name));
        true
    }

    fn remove_selected(&mut self) -> bool {
        let Some(service) = self
            .selection
            .selected()
            .and_then(|i| self.catalog.get(i))
        else {
            return false;
        };
        if !self.cart.remove_one(&service.id) {
            return false;
        }
        tracing::info!(
            service = %service.id,
            quantity = self.cart.quantity_of(&service.id),
            total = self.cart.total(),
            "Removed service from cart"
        );
        self.status = Some(format!("Quitado: {}", service.name));
        true
    }

    fn clear_cart(&mut self) {
        self.cart.clear();
        tracing::info!("Cleared cart");
        self.status = Some(String::from("Carrito vaciado"));
    }

    fn record_booking(&mut self, booking: Booking) {
        tracing::info!(
            name = %booking.name,
            date = %booking.date,
            time = %booking.time,
            items = self.cart.item_count(),
            total = self.cart.total(),
            "Confirmed appointment"
        );
        self.status = Some(format!("Cita confirmada: {booking}"));
        self.bookings.push(booking);
        self.cart.clear();
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        let [header, body, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(area);
        Line::styled(TITLE, TITLE_STYLE).render(header, buf);
        Storefront::new(&self.catalog, &self.cart).render(body, buf, &mut self.selection);
        let footer_line = match self.status {
            Some(ref status) => Line::styled(format!(" {status}"), STATUS_STYLE),
            None => Line::styled(HINT, MUTED_STYLE),
        };
        footer_line.render(footer, buf);
        CartSidebar::new(&self.cart).render(area, buf, &mut self.sidebar);
        if self.state == AppState::Helping {
            Help.render(area, buf);
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AppState {
    Browsing,
    Helping,
    Quitting,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Service;
    use time::macros::date;

    fn app() -> App {
        let catalog = Catalog::new(vec![
            Service::new("corte", "Corte de pelo", 15),
            Service::new("barba", "Arreglo de barba", 10),
            Service::new("tinte", "Tinte", 0),
        ])
        .unwrap();
        App::new(catalog, date!(2026 - 10 - 19))
    }

    fn press_all(app: &mut App, keys: &[KeyCode]) {
        for &k in keys {
            assert!(app.handle_key(k), "key {k:?} was rejected");
        }
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            assert!(app.handle_key(KeyCode::Char(c)));
        }
    }

    fn rows(app: &mut App, width: u16, height: u16) -> Vec<String> {
        let area = Rect::new(0, 0, width, height);
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        (0..height)
            .map(|y| {
                (0..width)
                    .filter_map(|x| buffer.cell((x, y)).map(ratatui::buffer::Cell::symbol))
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_catalog_navigation() {
        let mut app = app();
        assert!(!app.handle_key(KeyCode::Char('k')));
        press_all(&mut app, &[KeyCode::Char('j'), KeyCode::Down]);
        assert_eq!(app.selection.selected(), Some(2));
        assert!(!app.handle_key(KeyCode::Down));
        assert!(app.handle_key(KeyCode::Up));
        assert_eq!(app.selection.selected(), Some(1));
    }

    #[test]
    fn test_add_and_remove() {
        let mut app = app();
        press_all(
            &mut app,
            &[KeyCode::Enter, KeyCode::Char('+'), KeyCode::Down, KeyCode::Char('a')],
        );
        assert_eq!(app.cart.quantity_of("corte"), 2);
        assert_eq!(app.cart.quantity_of("barba"), 1);
        assert_eq!(app.cart.total(), 40);
        assert!(app.handle_key(KeyCode::Char('-')));
        assert_eq!(app.cart.quantity_of("barba"), 0);
        assert!(!app.handle_key(KeyCode::Char('x')));
        assert_eq!(app.status.as_deref(), Some("Quitado: Arreglo de barba"));
    }

    #[test]
    fn test_booking_flow() {
        let mut app = app();
        press_all(&mut app, &[KeyCode::Enter, KeyCode::Char('c')]);
        assert!(app.sidebar.is_open());
        // Keys now go to the name field
        type_text(&mut app, "Carla");
        press_all(
            &mut app,
            &[
                KeyCode::Tab,
                KeyCode::Right,
                KeyCode::Enter,
                KeyCode::Tab,
                KeyCode::Down,
                KeyCode::Down,
                KeyCode::Tab,
                KeyCode::Enter,
            ],
        );
        assert!(!app.sidebar.is_open());
        assert!(app.cart.is_empty());
        assert_eq!(app.bookings.len(), 1);
        assert_eq!(app.bookings[0].name, "Carla");
        assert_eq!(app.bookings[0].date, date!(2026 - 10 - 20));
        assert_eq!(app.bookings[0].time.to_string(), "10:00");
        assert_eq!(
            app.status.as_deref(),
            Some("Cita confirmada: Carla, 2026-10-20 a las 10:00")
        );
    }

    #[test]
    fn test_confirm_rejected_until_complete() {
        let mut app = app();
        press_all(
            &mut app,
            &[KeyCode::Enter, KeyCode::Char('c'), KeyCode::BackTab, KeyCode::BackTab],
        );
        // Focus is on the confirm button, but nothing has been filled in
        assert!(!app.handle_key(KeyCode::Enter));
        assert!(app.sidebar.is_open());
        assert!(app.bookings.is_empty());
    }

    #[test]
    fn test_clear_from_sidebar() {
        let mut app = app();
        press_all(
            &mut app,
            &[KeyCode::Enter, KeyCode::Char('c'), KeyCode::BackTab, KeyCode::Enter],
        );
        assert!(app.cart.is_empty());
        assert!(app.sidebar.is_open());
        assert_eq!(app.status.as_deref(), Some("Carrito vaciado"));
        // Only closing works on an empty cart
        assert!(!app.handle_key(KeyCode::Tab));
        assert!(app.handle_key(KeyCode::Esc));
        assert!(!app.sidebar.is_open());
    }

    #[test]
    fn test_help_and_quit() {
        let mut app = app();
        assert!(app.handle_key(KeyCode::Char('?')));
        assert_eq!(app.state, AppState::Helping);
        assert!(app.handle_key(KeyCode::Char('z')));
        assert_eq!(app.state, AppState::Browsing);
        assert!(!app.handle_key(KeyCode::Char('z')));
        assert!(app.handle_key(KeyCode::Char('q')));
        assert!(app.quitting());
    }

    #[test]
    fn test_escape_quits_when_closed() {
        let mut app = app();
        assert!(app.handle_key(KeyCode::Esc));
        assert!(app.quitting());
    }

    #[test]
    fn test_page_keys_change_month() {
        let mut app = app();
        press_all(&mut app, &[KeyCode::Enter, KeyCode::Char('c')]);
        assert!(!app.handle_key(KeyCode::PageUp));
        assert!(app.handle_key(KeyCode::PageDown));
        assert_eq!(app.sidebar.month().first(), date!(2026 - 11 - 01));
        assert!(app.handle_key(KeyCode::PageDown));
        assert_eq!(app.sidebar.month().first(), date!(2026 - 12 - 01));
        assert!(app.handle_key(KeyCode::PageUp));
        assert_eq!(app.sidebar.month().first(), date!(2026 - 11 - 01));
        // Escape closes the cart rather than quitting
        assert!(app.handle_key(KeyCode::Esc));
        assert!(!app.sidebar.is_open());
        assert!(!app.quitting());
    }

    #[test]
    fn test_render_closed() {
        let mut app = app();
        press_all(&mut app, &[KeyCode::Enter]);
        let rows = rows(&mut app, 60, 12);
        assert_eq!(rows[0].trim_end(), TITLE);
        assert!(rows[1].starts_with("┌ Servicios "));
        assert!(rows[2].contains("▸ Corte de pelo"));
        assert!(rows[2].contains("×1"));
        // The cart button sits over the bottom border of the service list
        assert!(rows[10].contains("1 item(s) 15 €"));
        assert_eq!(rows[11].trim_end(), " Añadido: Corte de pelo");
    }

    #[test]
    fn test_render_open_empty_cart() {
        let mut app = app();
        press_all(&mut app, &[KeyCode::Char('c')]);
        let rows = rows(&mut app, 80, 24);
        assert!(rows.iter().any(|r| r.contains("Aún no has añadido ningún servicio.")));
        assert!(rows[22].contains("Carrito"));
    }
}
