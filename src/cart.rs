use crate::catalog::Service;

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct CartItem {
    pub(crate) service: Service,
    // Invariant: Never zero
    pub(crate) quantity: u32,
}

impl CartItem {
    /// Price of the whole line; zero for quoted services
    pub(crate) fn subtotal(&self) -> u64 {
        u64::from(self.service.price) * u64::from(self.quantity)
    }
}

/// The selected services, kept in the order they were first added
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub(crate) fn new() -> Cart {
        Cart::default()
    }

    pub(crate) fn add(&mut self, service: &Service) {
        if let Some(item) = self.items.iter_mut().find(|it| it.service.id == service.id) {
            item.quantity = item.quantity.saturating_add(1);
        } else {
            self.items.push(CartItem {
                service: service.clone(),
                quantity: 1,
            });
        }
    }

    // Returns `false` if there is no item for the given service
    pub(crate) fn remove_one(&mut self, id: &str) -> bool {
        let Some(pos) = self.items.iter().position(|it| it.service.id == id) else {
            return false;
        };
        if self.items[pos].quantity > 1 {
            self.items[pos].quantity -= 1;
        } else {
            self.items.remove(pos);
        }
        true
    }

    pub(crate) fn clear(&mut self) {
        self.items.clear();
    }

    pub(crate) fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn item_count(&self) -> u64 {
        self.items.iter().map(|it| u64::from(it.quantity)).sum()
    }

    pub(crate) fn total(&self) -> u64 {
        self.items.iter().map(CartItem::subtotal).sum()
    }

    pub(crate) fn quantity_of(&self, id: &str) -> u32 {
        self.items
            .iter()
            .find(|it| it.service.id == id)
            .map_or(0, |it| it.quantity)
    }
}
