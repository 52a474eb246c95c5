// src/services/user_service.rs

use chrono::Utc;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{User, UserRole},
};

#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
}

impl UserService {
    pub fn new(user_repo: UserRepository) -> Self {
        Self { user_repo }
    }

    pub async fn get_user(&self, id: &str) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    // La lista completa de usuarios es solo para administradores.
    // Cualquier otro rol recibe una lista vacía, no un error: las
    // pantallas que consumen esto simplemente se ven vacías.
    pub async fn list_users(&self, requester: &User) -> Result<Vec<User>, AppError> {
        if requester.role != UserRole::Admin {
            return Ok(Vec::new());
        }
        self.user_repo.list_all().await
    }

    pub async fn list_customers(&self) -> Result<Vec<User>, AppError> {
        self.user_repo.list_by_role(UserRole::Cliente).await
    }

    pub async fn list_delivery_persons(&self) -> Result<Vec<User>, AppError> {
        self.user_repo.list_by_role(UserRole::Domiciliario).await
    }

    pub async fn change_role(&self, id: &str, role: UserRole) -> Result<User, AppError> {
        self.user_repo.update_role(id, role, Utc::now()).await
    }
}
