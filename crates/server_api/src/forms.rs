use shared::{error::FieldErrors, protocol::fields};
use uuid::Uuid;

use crate::validate::{missing, FieldKind, FieldRule, FormInput, Schema, ValidatedData};

pub const CATEGORY_NAME_MAX_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCategoryInput {
    pub name: String,
}

impl FormInput for PageCategoryInput {
    fn schema() -> Schema {
        Schema::new().field(
            fields::NAME,
            FieldRule::required(FieldKind::Text {
                min_len: 1,
                max_len: CATEGORY_NAME_MAX_LEN,
            }),
        )
    }

    fn from_validated(mut data: ValidatedData) -> Result<Self, FieldErrors> {
        let name = data
            .take_text(fields::NAME)
            .ok_or_else(|| missing(fields::NAME))?;
        Ok(Self { name })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PizzaSelectionInput {
    pub pizza_uuid: Uuid,
}

impl FormInput for PizzaSelectionInput {
    fn schema() -> Schema {
        Schema::new().field(fields::PIZZA_UUID, FieldRule::required(FieldKind::Uuid))
    }

    fn from_validated(data: ValidatedData) -> Result<Self, FieldErrors> {
        let pizza_uuid = data
            .uuid(fields::PIZZA_UUID)
            .ok_or_else(|| missing(fields::PIZZA_UUID))?;
        Ok(Self { pizza_uuid })
    }
}
