//! Menu

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::validation::{ValidationError, ValidationErrors};

/// Backend identifier of a dish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MenuItemId(pub i64);

impl fmt::Display for MenuItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Lifecycle status of a dish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemStatus {
    /// On the menu.
    #[serde(rename = "ACTIVO")]
    Active,

    /// Withdrawn from the menu.
    #[serde(rename = "DESCONTINUADO")]
    Discontinued,
}

impl ItemStatus {
    /// Wire name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVO",
            Self::Discontinued => "DESCONTINUADO",
        }
    }

    /// The other status.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Discontinued,
            Self::Discontinued => Self::Active,
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dish as served by the backend. The portal only holds read-only copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    /// Dish identifier.
    pub id: MenuItemId,

    /// Category display name.
    #[serde(rename = "categoriaNombre")]
    pub category: String,

    /// Dish display name.
    #[serde(rename = "nombreItem")]
    pub name: String,

    /// Optional description.
    #[serde(rename = "descripcion", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Unit price.
    #[serde(rename = "precio", with = "rust_decimal::serde::float")]
    pub price: Decimal,

    /// Whether the kitchen currently offers the dish.
    #[serde(rename = "disponible")]
    pub available: bool,

    /// Lifecycle status.
    #[serde(rename = "estado")]
    pub status: ItemStatus,
}

impl MenuItem {
    /// Whether customers may add the dish to a cart.
    #[must_use]
    pub fn is_orderable(&self) -> bool {
        self.available && self.status == ItemStatus::Active
    }

    /// Copy of the dish with its status flipped. Availability follows the new status.
    #[must_use]
    pub fn with_toggled_status(&self) -> Self {
        let status = self.status.toggled();

        Self {
            status,
            available: status == ItemStatus::Active,
            ..self.clone()
        }
    }
}

/// Dishes customers can order, in backend order.
pub fn orderable(items: impl IntoIterator<Item = MenuItem>) -> Vec<MenuItem> {
    items.into_iter().filter(MenuItem::is_orderable).collect()
}

/// Column filters of the dish administration table. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DishFilter {
    /// Case-insensitive name fragment.
    pub name: String,

    /// Case-insensitive category fragment.
    pub category: String,

    /// Fragment of the price's decimal text.
    pub price: String,

    /// Case-insensitive status fragment.
    pub status: String,
}

impl DishFilter {
    /// Whether `item` passes every non-empty filter.
    #[must_use]
    pub fn matches(&self, item: &MenuItem) -> bool {
        contains_ignore_case(&item.name, &self.name)
            && contains_ignore_case(&item.category, &self.category)
            && item.price.normalize().to_string().contains(self.price.trim())
            && contains_ignore_case(item.status.as_str(), &self.status)
    }

    /// Items passing the filter, in their original order.
    pub fn apply<'a>(&self, items: &'a [MenuItem]) -> Vec<&'a MenuItem> {
        items.iter().filter(|item| self.matches(item)).collect()
    }
}

pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim();

    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Payload for creating a dish.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMenuItem {
    /// Dish display name.
    #[serde(rename = "nombreItem")]
    pub name: String,

    /// Unit price.
    #[serde(rename = "precio", with = "rust_decimal::serde::float")]
    pub price: Decimal,

    /// Category display name.
    #[serde(rename = "categoriaNombre")]
    pub category: String,

    /// Optional description, omitted from the request when absent.
    #[serde(rename = "descripcion", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Initial status.
    #[serde(rename = "estado")]
    pub status: ItemStatus,
}

/// Editable fields of the dish form, as typed by an administrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DishDraft {
    /// Dish display name.
    pub name: String,

    /// Category display name.
    pub category: String,

    /// Free-text description.
    pub description: String,

    /// Price as typed.
    pub price: String,

    /// Whether the dish should be on the menu.
    pub available: bool,
}

impl Default for DishDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            category: String::new(),
            description: String::new(),
            price: "0".to_string(),
            available: true,
        }
    }
}

impl From<&MenuItem> for DishDraft {
    fn from(item: &MenuItem) -> Self {
        Self {
            name: item.name.clone(),
            category: item.category.clone(),
            description: item.description.clone().unwrap_or_default(),
            price: item.price.normalize().to_string(),
            available: item.available,
        }
    }
}

impl DishDraft {
    /// Validate the draft into a creation payload.
    ///
    /// # Errors
    ///
    /// Returns every failed field check.
    pub fn validate(&self) -> Result<NewMenuItem, ValidationErrors> {
        let mut errors: SmallVec<[ValidationError; 4]> = SmallVec::new();

        let name = self.name.trim();
        let category = self.category.trim();

        if name.chars().count() < 3 {
            errors.push(ValidationError::TooShort { field: "nombreItem", min: 3 });
        }

        if category.chars().count() < 3 {
            errors.push(ValidationError::TooShort { field: "categoriaNombre", min: 3 });
        }

        let price = match self.price.trim().parse::<Decimal>() {
            Ok(price) if price.is_sign_negative() && !price.is_zero() => {
                errors.push(ValidationError::Negative { field: "precio" });
                None
            }
            Ok(price) => Some(price),
            Err(_parse_error) => {
                errors.push(ValidationError::NotANumber { field: "precio" });
                None
            }
        };

        let Some(price) = price.filter(|_| errors.is_empty()) else {
            return Err(ValidationErrors::new(errors));
        };

        let description = self.description.trim();

        Ok(NewMenuItem {
            name: name.to_string(),
            price,
            category: category.to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            status: if self.available {
                ItemStatus::Active
            } else {
                ItemStatus::Discontinued
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use testresult::TestResult;

    use super::*;

    fn dish(id: i64, name: &str, category: &str, price: &str) -> TestResult<MenuItem> {
        Ok(MenuItem {
            id: MenuItemId(id),
            category: category.to_string(),
            name: name.to_string(),
            description: None,
            price: Decimal::from_str(price)?,
            available: true,
            status: ItemStatus::Active,
        })
    }

    #[test]
    fn deserializes_backend_dish() -> TestResult {
        let item: MenuItem = serde_json::from_str(
            r#"{
                "id": 7,
                "categoriaNombre": "Sopas",
                "nombreItem": "Locro de papa",
                "descripcion": null,
                "precio": 4.5,
                "disponible": true,
                "estado": "ACTIVO"
            }"#,
        )?;

        assert_eq!(item.id, MenuItemId(7));
        assert_eq!(item.name, "Locro de papa");
        assert_eq!(item.price, Decimal::from_str("4.5")?);
        assert!(item.description.is_none());
        assert!(item.is_orderable());

        Ok(())
    }

    #[test]
    fn unavailable_or_discontinued_dishes_are_not_orderable() -> TestResult {
        let unavailable = MenuItem {
            available: false,
            ..dish(1, "Seco de pollo", "Platos fuertes", "6.00")?
        };
        let discontinued = MenuItem {
            status: ItemStatus::Discontinued,
            ..dish(2, "Encebollado", "Sopas", "5.00")?
        };
        let on_menu = dish(3, "Ceviche", "Mariscos", "8.00")?;

        let visible = orderable([unavailable, discontinued, on_menu.clone()]);

        assert_eq!(visible, vec![on_menu]);

        Ok(())
    }

    #[test]
    fn toggling_status_moves_availability_with_it() -> TestResult {
        let item = dish(1, "Seco de pollo", "Platos fuertes", "6.00")?;

        let toggled = item.with_toggled_status();

        assert_eq!(toggled.status, ItemStatus::Discontinued);
        assert!(!toggled.available);
        assert_eq!(toggled.with_toggled_status(), item);

        Ok(())
    }

    #[test]
    fn filter_matches_case_insensitive_fragments() -> TestResult {
        let items = [
            dish(1, "Seco de pollo", "Platos fuertes", "6.50")?,
            dish(2, "Encebollado", "Sopas", "5.00")?,
            dish(3, "Sopa de quinua", "Sopas", "3.75")?,
        ];

        let by_category = DishFilter {
            category: "SOPA".to_string(),
            ..DishFilter::default()
        };
        let by_price = DishFilter {
            price: "6.5".to_string(),
            ..DishFilter::default()
        };

        let names: Vec<&str> = by_category
            .apply(&items)
            .into_iter()
            .map(|item| item.name.as_str())
            .collect();

        assert_eq!(names, vec!["Encebollado", "Sopa de quinua"]);
        assert_eq!(by_price.apply(&items).len(), 1);
        assert_eq!(DishFilter::default().apply(&items).len(), 3);

        Ok(())
    }

    #[test]
    fn valid_draft_becomes_new_item() -> TestResult {
        let draft = DishDraft {
            name: " Bolón de verde ".to_string(),
            category: "Desayunos".to_string(),
            description: "   ".to_string(),
            price: "3.50".to_string(),
            available: false,
        };

        let item = draft.validate()?;

        assert_eq!(item.name, "Bolón de verde");
        assert_eq!(item.price, Decimal::from_str("3.5")?);
        assert_eq!(item.description, None);
        assert_eq!(item.status, ItemStatus::Discontinued);

        Ok(())
    }

    #[test]
    fn invalid_draft_reports_each_field() {
        let draft = DishDraft {
            name: "Té".to_string(),
            category: String::new(),
            description: String::new(),
            price: "-1".to_string(),
            available: true,
        };

        let errors = draft.validate().err().map(ValidationErrors::into_vec);

        assert_eq!(
            errors,
            Some(vec![
                ValidationError::TooShort { field: "nombreItem", min: 3 },
                ValidationError::TooShort { field: "categoriaNombre", min: 3 },
                ValidationError::Negative { field: "precio" },
            ])
        );
    }

    #[test]
    fn new_item_omits_missing_description() -> TestResult {
        let item = NewMenuItem {
            name: "Colada morada".to_string(),
            price: Decimal::from_str("2.25")?,
            category: "Bebidas".to_string(),
            description: None,
            status: ItemStatus::Active,
        };

        let json = serde_json::to_value(&item)?;

        assert_eq!(
            json,
            serde_json::json!({
                "nombreItem": "Colada morada",
                "precio": 2.25,
                "categoriaNombre": "Bebidas",
                "estado": "ACTIVO",
            })
        );

        Ok(())
    }
}
