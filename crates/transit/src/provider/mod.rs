//! Route and schedule catalogs.

pub mod static_catalog;

pub use static_catalog::StaticCatalog;
