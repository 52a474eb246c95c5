pub mod auth;
pub use auth::AuthService;
pub mod user_service;
pub use user_service::UserService;
pub mod product_service;
pub use product_service::ProductService;
pub mod inventory_service;
pub use inventory_service::InventoryService;
pub mod order_service;
pub mod billing_service;
pub mod delivery_service;
pub use delivery_service::DeliveryService;

pub use billing_service::BillingService;

pub use order_service::OrderService;
