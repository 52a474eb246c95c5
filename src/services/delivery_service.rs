// src/services/delivery_service.rs

use crate::{common::error::AppError, db::DeliveryRepository, models::deliveries::DeliveryDetail};

// Las entregas se crean y sincronizan desde el servicio de pedidos; por
// acá solo se consultan.
#[derive(Clone)]
pub struct DeliveryService {
    delivery_repo: DeliveryRepository,
}

impl DeliveryService {
    pub fn new(delivery_repo: DeliveryRepository) -> Self {
        Self { delivery_repo }
    }

    pub async fn list_deliveries(&self) -> Result<Vec<DeliveryDetail>, AppError> {
        self.delivery_repo.list_details().await
    }
}
