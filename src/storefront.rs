use crate::cart::Cart;
use crate::catalog::Catalog;
use crate::theme::{
    storefront::{HIGHLIGHT_STYLE, IN_CART_STYLE},
    BASE_STYLE, MUTED_STYLE, TITLE_STYLE,
};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, List, ListItem, ListState, StatefulWidget},
};

/// Width of the price column, wide enough for "Presupuesto"
const PRICE_WIDTH: usize = 11;

/// The list of services on offer, each marked with how many of it are in the
/// cart
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Storefront<'a> {
    catalog: &'a Catalog,
    cart: &'a Cart,
}

impl<'a> Storefront<'a> {
    pub(crate) fn new(catalog: &'a Catalog, cart: &'a Cart) -> Storefront<'a> {
        Storefront { catalog, cart }
    }
}

impl StatefulWidget for Storefront<'_> {
    type State = ListState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let name_width = self
            .catalog
            .services()
            .iter()
            .map(|s| s.name.chars().count())
            .max()
            .unwrap_or(0);
        let items = self.catalog.services().iter().map(|s| {
            let price_style = if s.is_quoted() {
                MUTED_STYLE
            } else {
                BASE_STYLE
            };
            let mut spans = vec![
                Span::raw(format!("{:<name_width$}  ", s.name)),
                Span::styled(format!("{:>PRICE_WIDTH$}", s.price_label()), price_style),
            ];
            let qty = self.cart.quantity_of(&s.id);
            if qty > 0 {
                spans.push(Span::styled(format!("  ×{qty}"), IN_CART_STYLE));
            }
            ListItem::new(Line::from(spans))
        });
        let list = List::new(items)
            .block(
                Block::bordered()
                    .title(" Servicios ")
                    .title_style(TITLE_STYLE),
            )
            .style(BASE_STYLE)
            .highlight_style(HIGHLIGHT_STYLE)
            .highlight_symbol("▸ ");
        StatefulWidget::render(list, area, buf, state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Service;

    #[test]
    fn test_render() {
        let catalog = Catalog::new(vec![
            Service::new("corte", "Corte de pelo", 15),
            Service::new("tinte", "Tinte", 0),
        ])
        .unwrap();
        let mut cart = Cart::new();
        cart.add(&catalog.services()[0]);
        cart.add(&catalog.services()[0]);
        let mut state = ListState::default().with_selected(Some(1));
        let area = Rect::new(0, 0, 40, 4);
        let mut buffer = Buffer::empty(area);
        Storefront::new(&catalog, &cart).render(area, &mut buffer, &mut state);
        let rows = (0..4u16)
            .map(|y| {
                (0..40u16)
                    .filter_map(|x| buffer.cell((x, y)).map(ratatui::buffer::Cell::symbol))
                    .collect::<String>()
            })
            .collect::<Vec<_>>();
        assert_eq!(
            rows,
            [
                format!("┌ Servicios {}┐", "─".repeat(27)),
                String::from("│  Corte de pelo         15 €  ×2      │"),
                String::from("│▸ Tinte          Presupuesto          │"),
                format!("└{}┘", "─".repeat(38)),
            ]
        );
        let highlighted = buffer.cell((5, 2)).unwrap();
        assert_eq!(highlighted.style().fg, HIGHLIGHT_STYLE.fg);
        let in_cart = buffer.cell((30, 1)).unwrap();
        assert_eq!(in_cart.style().fg, IN_CART_STYLE.fg);
    }
}
