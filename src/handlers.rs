pub mod auth;
pub mod users;
pub mod products;
pub mod inventory;
pub mod orders;
pub mod billing;
pub mod deliveries;
