//! Menu Catalog - in-memory dish registry
//!
//! Dishes are keyed by id. Listing is always sorted by name, which is the
//! order the admin menu shows.

use dashmap::DashMap;
use shared::models::{Dish, DishCreate, DishUpdate};
use validator::Validate;

use crate::utils::{AppError, AppResult};

#[derive(Debug, Default)]
pub struct MenuCatalog {
    dishes: DashMap<String, Dish>,
}

impl MenuCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog holding `dishes` as-is
    pub fn with_dishes(dishes: impl IntoIterator<Item = Dish>) -> Self {
        let catalog = Self::new();
        for dish in dishes {
            catalog.dishes.insert(dish.id.clone(), dish);
        }
        catalog
    }

    pub fn len(&self) -> usize {
        self.dishes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dishes.is_empty()
    }

    /// All dishes sorted by name (ties by id)
    pub fn list(&self) -> Vec<Dish> {
        let mut dishes: Vec<Dish> = self.dishes.iter().map(|e| e.value().clone()).collect();
        dishes.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        dishes
    }

    pub fn get(&self, id: &str) -> AppResult<Dish> {
        self.dishes
            .get(id)
            .map(|e| e.value().clone())
            .ok_or_else(|| AppError::dish_not_found(id))
    }

    /// 创建菜品
    pub fn create(&self, payload: DishCreate) -> AppResult<Dish> {
        payload.validate()?;

        let dish = Dish {
            id: uuid::Uuid::new_v4().to_string(),
            name: payload.name,
            description: payload.description,
            price: payload.price,
            category: payload.category,
            image_url: payload.image_url,
        };
        self.dishes.insert(dish.id.clone(), dish.clone());

        tracing::info!(dish_id = %dish.id, name = %dish.name, "Dish created");
        Ok(dish)
    }

    /// 更新菜品
    pub fn update(&self, id: &str, payload: DishUpdate) -> AppResult<Dish> {
        payload.validate()?;

        let mut entry = self
            .dishes
            .get_mut(id)
            .ok_or_else(|| AppError::dish_not_found(id))?;
        entry.apply(payload);
        let dish = entry.value().clone();
        drop(entry);

        tracing::info!(dish_id = %dish.id, "Dish updated");
        Ok(dish)
    }

    /// 删除菜品
    pub fn delete(&self, id: &str) -> AppResult<Dish> {
        let (_, dish) = self
            .dishes
            .remove(id)
            .ok_or_else(|| AppError::dish_not_found(id))?;

        tracing::info!(dish_id = %id, "Dish deleted");
        Ok(dish)
    }
}
