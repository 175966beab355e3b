//! Menu - 菜单管理

pub mod catalog;

pub use catalog::MenuCatalog;
