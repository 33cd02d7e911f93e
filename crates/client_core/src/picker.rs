use shared::protocol::{fields, format_price, PizzaPageView, PizzaSummary};
use thiserror::Error;
use uuid::Uuid;

use crate::surface::FormValues;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PickerError {
    #[error("pizza {0} is not on the menu")]
    UnknownPizza(Uuid),
    #[error("no pizza selected")]
    NothingSelected,
}

/// Radio list state of the lunch order page.
#[derive(Debug, Clone, Default)]
pub struct PizzaPicker {
    pizzas: Vec<PizzaSummary>,
    stored: Option<Uuid>,
    value: Option<Uuid>,
}

impl PizzaPicker {
    pub fn from_view(view: &PizzaPageView) -> Self {
        let mut picker = Self::default();
        picker.apply_view(view);
        picker
    }

    pub fn pizzas(&self) -> &[PizzaSummary] {
        &self.pizzas
    }

    pub fn value(&self) -> Option<Uuid> {
        self.value
    }

    pub fn stored(&self) -> Option<Uuid> {
        self.stored
    }

    pub fn select(&mut self, uuid: Uuid) -> Result<(), PickerError> {
        if !self.pizzas.iter().any(|pizza| pizza.uuid == uuid) {
            return Err(PickerError::UnknownPizza(uuid));
        }
        self.value = Some(uuid);
        Ok(())
    }

    pub fn is_checked(&self, uuid: Uuid) -> bool {
        self.value == Some(uuid)
    }

    /// Server-confirmed selection, rendered with a check mark.
    pub fn is_confirmed(&self, uuid: Uuid) -> bool {
        self.stored == Some(uuid)
    }

    pub fn label(pizza: &PizzaSummary) -> String {
        format!("{} ({})", pizza.name, format_price(pizza.price))
    }

    pub fn form_values(&self) -> Result<FormValues, PickerError> {
        let value = self.value.ok_or(PickerError::NothingSelected)?;
        Ok(FormValues::from([(
            fields::PIZZA_UUID.to_string(),
            value.to_string(),
        )]))
    }

    /// Resyncs with the latest loader data; the radio value follows the
    /// stored selection.
    pub fn apply_view(&mut self, view: &PizzaPageView) {
        let mut pizzas = view.pizzas.clone();
        pizzas.sort_by_key(|pizza| pizza.price);
        self.pizzas = pizzas;
        self.stored = view
            .pizza_uuid
            .filter(|uuid| self.pizzas.iter().any(|pizza| pizza.uuid == *uuid));
        self.value = self.stored;
    }
}

#[cfg(test)]
#[path = "tests/picker_tests.rs"]
mod tests;
