//! Data models
//!
//! Menu, order and report types shared by the server and its clients.

pub mod dish;
pub mod order;
pub mod report;

pub use dish::{Dish, DishCategory, DishCreate, DishUpdate, category_label};
pub use order::{DishRow, Order, OrderItem, OrderItemRow, OrderRow};
pub use report::{
    CategoryShare, DishShare, PopularDish, ReportData, ReportPeriod, ReportView, ReportWindow,
};
