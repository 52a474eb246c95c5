// src/services/order_service.rs

use std::collections::HashMap;

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{DeliveryRepository, OrderRepository, UserRepository},
    models::auth::UserRole,
    models::orders::{
        CreateOrderPayload, Order, OrderDetail, OrderItemDetail, OrderStatus, OrderWithCustomer,
        UpdateOrderStatusPayload,
    },
};

#[derive(Clone)]
pub struct OrderService {
    order_repo: OrderRepository,
    user_repo: UserRepository,
    delivery_repo: DeliveryRepository,
    pool: SqlitePool,
}

impl OrderService {
    pub fn new(
        order_repo: OrderRepository,
        user_repo: UserRepository,
        delivery_repo: DeliveryRepository,
        pool: SqlitePool,
    ) -> Self {
        Self { order_repo, user_repo, delivery_repo, pool }
    }

    // Pedidos con cliente y líneas. Con `customer_id` en Some se
    // restringe a los pedidos de ese cliente.
    pub async fn list_orders(
        &self,
        customer_id: Option<&str>,
    ) -> Result<Vec<OrderDetail>, AppError> {
        let headers = self.order_repo.list_with_customer(customer_id).await?;
        let items = self.order_repo.list_items_with_product(customer_id).await?;

        let mut items_by_order: HashMap<String, Vec<OrderItemDetail>> = HashMap::new();
        for item in items {
            items_by_order
                .entry(item.order_id.clone())
                .or_default()
                .push(item);
        }

        let orders = headers
            .into_iter()
            .map(|order| {
                let items = items_by_order.remove(&order.id).unwrap_or_default();
                OrderDetail { order, items }
            })
            .collect();

        Ok(orders)
    }

    // Crea el pedido con sus líneas. El total NO se recalcula a partir
    // de las líneas: se guarda el que mandó el caller, tal cual.
    pub async fn create_order(
        &self,
        payload: &CreateOrderPayload,
    ) -> Result<OrderDetail, AppError> {
        // 1. El cliente tiene que existir
        let customer = self.user_repo
            .find_by_id(&payload.customer_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let order_id = Uuid::new_v4().to_string();
        let now = Utc::now();

        // --- INICIO DE LA TRANSACCIÓN ---
        // Cabecera y líneas juntas: si una línea falla (por ejemplo un
        // producto inexistente) no queda ningún pedido a medias.
        let mut tx = self.pool.begin().await?;

        let order = self.order_repo
            .insert_order(
                &mut *tx,
                &order_id,
                &customer.id,
                &payload.shipping_address,
                payload.total_cents,
                payload.notes.as_deref(),
                now,
            )
            .await?;

        for item in &payload.items {
            let subtotal = item.quantity * item.unit_price_cents;
            self.order_repo
                .insert_item(
                    &mut *tx,
                    &Uuid::new_v4().to_string(),
                    &order_id,
                    &item.product_id,
                    item.quantity,
                    item.unit_price_cents,
                    subtotal,
                )
                .await?;
        }

        tx.commit().await?;
        // --- FIN DE LA TRANSACCIÓN ---

        // 2. Armar el detalle para responder
        let items = self.order_repo.items_for_order(&order_id).await?;
        let order = OrderWithCustomer {
            id: order.id,
            customer_id: order.customer_id,
            customer_name: customer.name,
            status: order.status,
            shipping_address: order.shipping_address,
            total_cents: order.total_cents,
            notes: order.notes,
            delivery_person_id: None,
            delivery_person_name: None,
            created_at: order.created_at,
            updated_at: order.updated_at,
        };

        tracing::info!("🧾 Pedido {} creado para {}", order.id, order.customer_name);
        Ok(OrderDetail { order, items })
    }

    // Cambio de estado con asignación opcional de domiciliario. Pedido,
    // alta de entrega y sincronización van en una sola transacción.
    pub async fn update_status(
        &self,
        id: &str,
        payload: &UpdateOrderStatusPayload,
    ) -> Result<Order, AppError> {
        // 1. Si viene domiciliario, validar que exista y tenga el rol
        let delivery_person = match payload.delivery_person_id.as_deref() {
            Some(person_id) => {
                let person = self.user_repo
                    .find_by_id(person_id)
                    .await?
                    .ok_or(AppError::UserNotFound)?;
                if person.role != UserRole::Domiciliario {
                    return Err(AppError::DeliveryPersonInvalid);
                }
                Some(person)
            }
            None => None,
        };

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        // 2. Actualizar el pedido
        let order = self.order_repo
            .update_status(
                &mut *tx,
                id,
                payload.status.clone(),
                payload.delivery_person_id.as_deref(),
                now,
            )
            .await?
            .ok_or(AppError::OrderNotFound)?;

        // 3. Alta (o reasignación) de la entrega cuando hay domiciliario
        if let Some(person) = &delivery_person {
            self.delivery_repo
                .upsert_for_order(
                    &mut *tx,
                    &Uuid::new_v4().to_string(),
                    &order.id,
                    &person.id,
                    order.status.clone(),
                    payload.estimated_delivery,
                    payload.notes.as_deref(),
                    now,
                )
                .await?;
        }

        // 4. La entrega existente, si la hay, refleja el estado nuevo;
        // al llegar a 'entregado' queda estampada la hora real.
        let delivered_at = if order.status == OrderStatus::Entregado {
            Some(now)
        } else {
            None
        };
        self.delivery_repo
            .sync_status(&mut *tx, &order.id, order.status.clone(), delivered_at)
            .await?;

        tx.commit().await?;

        Ok(order)
    }
}
