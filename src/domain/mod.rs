//! Storefront domain: records, pricing and analytics. No I/O lives here.
pub mod aggregates;
pub mod analytics;
pub mod events;
pub mod pricing;
pub mod value_objects;
