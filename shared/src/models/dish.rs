//! Dish Model (menu entries)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::{Validate, ValidationError};

/// Menu category
///
/// Serialized with the backend's English names. [`DishCategory::label`] gives
/// the French label shown on the admin view and used as the report key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DishCategory {
    #[serde(rename = "Main Course")]
    MainCourse,
    Starter,
    Dessert,
    Beverage,
}

impl DishCategory {
    pub const ALL: [DishCategory; 4] = [
        DishCategory::MainCourse,
        DishCategory::Starter,
        DishCategory::Dessert,
        DishCategory::Beverage,
    ];

    /// Backend name ("Main Course", "Starter", ...)
    pub const fn as_str(&self) -> &'static str {
        match self {
            DishCategory::MainCourse => "Main Course",
            DishCategory::Starter => "Starter",
            DishCategory::Dessert => "Dessert",
            DishCategory::Beverage => "Beverage",
        }
    }

    /// Display label
    pub const fn label(&self) -> &'static str {
        match self {
            DishCategory::MainCourse => "Plat Principal",
            DishCategory::Starter => "Entrée",
            DishCategory::Dessert => "Dessert",
            DishCategory::Beverage => "Boisson",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == raw)
    }
}

impl FromStr for DishCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown dish category: {}", s))
    }
}

impl fmt::Display for DishCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display label for a raw category string.
///
/// Unrecognized categories pass through unchanged.
pub fn category_label(raw: &str) -> &str {
    DishCategory::parse(raw).map_or(raw, |c| c.label())
}

/// Dish entity
///
/// Also used as the snapshot embedded in order items, where `category` may
/// hold a value outside [`DishCategory`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dish {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub category: String,
    #[serde(default)]
    pub image_url: String,
}

fn validate_category(category: &str) -> Result<(), ValidationError> {
    if DishCategory::parse(category).is_some() {
        Ok(())
    } else {
        Err(ValidationError::new("dish_category"))
    }
}

fn validate_price(price: f64) -> Result<(), ValidationError> {
    if price.is_finite() && price >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::new("dish_price"))
    }
}

/// Create dish payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DishCreate {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(custom(function = "validate_price", message = "price must be a non-negative number"))]
    pub price: f64,
    #[validate(custom(function = "validate_category", message = "unknown dish category"))]
    pub category: String,
    #[serde(default)]
    pub image_url: String,
}

/// Update dish payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DishUpdate {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(custom(function = "validate_price", message = "price must be a non-negative number"))]
    pub price: Option<f64>,
    #[validate(custom(function = "validate_category", message = "unknown dish category"))]
    pub category: Option<String>,
    pub image_url: Option<String>,
}

impl Dish {
    /// Apply a validated update in place
    pub fn apply(&mut self, update: DishUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(image_url) = update.image_url {
            self.image_url = image_url;
        }
    }
}
