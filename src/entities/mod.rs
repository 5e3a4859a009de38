pub mod inventory_record;
pub mod location;
pub mod stock_location_link;
pub mod website_stock;
