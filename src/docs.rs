// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::get_me,

        // --- Users ---
        handlers::users::get_all_users,
        handlers::users::get_customers,
        handlers::users::get_delivery_persons,
        handlers::users::get_user_by_id,
        handlers::users::update_user_role,

        // --- Products ---
        handlers::products::get_all_products,
        handlers::products::get_product_by_id,
        handlers::products::create_product,
        handlers::products::update_product,
        handlers::products::delete_product,

        // --- Inventory ---
        handlers::inventory::get_warehouses,
        handlers::inventory::add_inventory,
        handlers::inventory::update_inventory,
        handlers::inventory::transfer_inventory,
        handlers::inventory::get_movements,

        // --- Orders ---
        handlers::orders::get_all_orders,
        handlers::orders::get_my_orders,
        handlers::orders::create_order,
        handlers::orders::update_order_status,

        // --- Billing ---
        handlers::billing::get_all_invoices,
        handlers::billing::get_my_invoices,
        handlers::billing::create_invoice,
        handlers::billing::pay_invoice,

        // --- Deliveries ---
        handlers::deliveries::get_all_deliveries,
    ),
    components(
        schemas(

            // --- Auth ---
            models::auth::UserRole,
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,
            models::auth::UpdateUserRolePayload,

            // --- Products ---
            models::products::ProductStatus,
            models::products::Product,
            models::products::ProductWithStock,
            models::products::CreateProductPayload,
            models::products::UpdateProductPayload,

            // --- Inventory ---
            models::inventory::WarehouseType,
            models::inventory::Warehouse,
            models::inventory::InventoryLevel,
            models::inventory::MovementType,
            models::inventory::InventoryMovement,
            models::inventory::MovementDetail,
            models::inventory::AddStockPayload,
            models::inventory::UpdateStockPayload,
            models::inventory::TransferStockPayload,

            // --- Orders ---
            models::orders::OrderStatus,
            models::orders::Order,
            models::orders::OrderItem,
            models::orders::OrderItemDetail,
            models::orders::OrderWithCustomer,
            models::orders::OrderDetail,
            models::orders::CreateOrderItemPayload,
            models::orders::CreateOrderPayload,
            models::orders::UpdateOrderStatusPayload,

            // --- Billing ---
            models::billing::InvoiceStatus,
            models::billing::Invoice,
            models::billing::InvoiceDetail,
            models::billing::CreateInvoicePayload,

            // --- Deliveries ---
            models::deliveries::Delivery,
            models::deliveries::DeliveryDetail,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticación y Registro"),
        (name = "Users", description = "Usuarios, Clientes y Domiciliarios"),
        (name = "Products", description = "Catálogo de Productos"),
        (name = "Inventory", description = "Bodegas, Existencias y Movimientos"),
        (name = "Orders", description = "Gestión de Pedidos"),
        (name = "Billing", description = "Facturación y Pagos"),
        (name = "Deliveries", description = "Entregas a Domicilio")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
