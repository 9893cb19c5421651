use crate::theme::BASE_STYLE;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Flex, Layout, Rect},
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Widget},
};

static TEXT: &[&str] = &[
    "Servicios",
    "  j, DOWN         Siguiente servicio",
    "  k, UP           Servicio anterior",
    "  ENTER, +, a     Añadir al carrito",
    "  -, x            Quitar uno del carrito",
    "  c, TAB          Abrir el carrito",
    "  ?               Mostrar esta ayuda",
    "  q, ESC          Salir",
    "",
    "Carrito",
    "  TAB, SHIFT-TAB  Campo siguiente / anterior",
    "  Flechas         Mover el día o cambiar la hora",
    "  PGUP/PGDN, <, > Mes anterior / siguiente",
    "  ENTER           Elegir día o pulsar botón",
    "  ESC             Cerrar el carrito",
    "",
    "Pulsa cualquier tecla para cerrar.",
];

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Help;

impl Widget for Help {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = TEXT.iter().map(|&s| Line::raw(s)).collect::<Vec<_>>();
        let text = Text::from(lines);
        let height = u16::try_from(text.height())
            .unwrap_or(u16::MAX)
            .min(area.height)
            .saturating_add(2);
        let width = u16::try_from(text.width())
            .unwrap_or(u16::MAX)
            .min(area.width)
            .saturating_add(2);
        let para = Paragraph::new(text)
            .block(
                Block::bordered()
                    .title(" Ayuda ")
                    .title_alignment(Alignment::Center),
            )
            .style(BASE_STYLE);
        let [help_area] = Layout::horizontal([width]).flex(Flex::Center).areas(area);
        let [help_area] = Layout::vertical([height])
            .flex(Flex::Center)
            .areas(help_area);
        let outer_area = Rect {
            x: help_area.x.saturating_sub(1),
            y: help_area.y,
            width: help_area.width.saturating_add(2),
            height: help_area.height,
        }
        .intersection(area);
        Clear.render(outer_area, buf);
        Block::new().style(BASE_STYLE).render(outer_area, buf);
        para.render(help_area, buf);
    }
}
