pub mod order;

pub use order::{OrderLine, PickupOrder};
