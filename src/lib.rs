//! qwat application library
//!
//! Catalog storefront for free and paid book references: the listing store,
//! the shopper-facing projection, listing activation and the admin gate.

pub mod modules;
pub mod utils;

/// Re-export commonly used types
pub use modules::catalog::{
    activation::{activate, Activation, PaymentInstructions},
    gate::{AccessGate, GateOutcome},
    models::{Listing, NewListing, Price, PriceInput},
    open_store,
    projection::{categories, project, CategoryFilter, MemoizedProjection, ViewState},
    store::{Catalog, CatalogError, CatalogStore, InitSource},
};
