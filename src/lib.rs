//! In-store pickup fulfillability evaluation with cross-location
//! inventory rebalancing.
//!
//! Given an order that designates a pickup location and a negative
//! upstream fulfillability verdict, the [`FulfillabilityEvaluator`]
//! re-checks each leaf line item against the pickup location and, where
//! the location is enabled but under-stocked, borrows the shortfall
//! from the stock's default location so the order can still be marked
//! fulfillable. Quantities are exact decimals compared at 4 fractional
//! digits; transfers conserve total inventory and never drive a record
//! negative.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod logging;
pub mod models;
pub mod repositories;
pub mod services;

pub use config::AppConfig;
pub use errors::ServiceError;
pub use events::{Event, EventSender};
pub use models::{OrderLine, PickupOrder};
pub use services::{
    EvaluationContext, FulfillabilityEvaluator, ItemAvailability, ItemAvailabilityChecker,
    QuantityRebalancer,
};
