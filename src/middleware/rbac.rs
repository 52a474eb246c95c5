// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{
    common::error::AppError,
    models::auth::{User, UserRole},
};

// La regla de acceso es una sola: pertenencia del rol del usuario al
// conjunto permitido. La usan igual el extractor y los chequeos manuales.
pub fn has_access(user: &User, allowed_roles: &[UserRole]) -> bool {
    allowed_roles.contains(&user.role)
}

/// 1. El trait que define un conjunto de roles permitidos
pub trait RoleSet: Send + Sync + 'static {
    fn allowed() -> &'static [UserRole];
}

/// 2. El extractor (guardián)
pub struct RequireRole<T>(pub PhantomData<T>);

// 3. Implementación de FromRequestParts
impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleSet,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // A. El guardia de autenticación ya dejó el usuario cargado
        let user = parts
            .extensions
            .get::<User>()
            .ok_or(AppError::InvalidToken)?;

        // B. Pertenencia al conjunto de roles
        if !has_access(user, T::allowed()) {
            return Err(AppError::AccessDenied);
        }

        Ok(RequireRole(PhantomData))
    }
}

// ---
// DEFINICIÓN DE LOS CONJUNTOS DE ROLES (TIPOS)
// ---

pub struct AdminOnly;
impl RoleSet for AdminOnly {
    fn allowed() -> &'static [UserRole] {
        &[UserRole::Admin]
    }
}

pub struct OfficeStaff;
impl RoleSet for OfficeStaff {
    fn allowed() -> &'static [UserRole] {
        &[UserRole::Admin, UserRole::Oficinista]
    }
}

pub struct WarehouseStaff;
impl RoleSet for WarehouseStaff {
    fn allowed() -> &'static [UserRole] {
        &[UserRole::Admin, UserRole::Bodeguero]
    }
}

pub struct DeliveryStaff;
impl RoleSet for DeliveryStaff {
    fn allowed() -> &'static [UserRole] {
        &[UserRole::Admin, UserRole::Domiciliario]
    }
}

// Quienes mueven un pedido por su ciclo de vida: la oficina lo asigna y
// el domiciliario lo marca entregado.
pub struct DeliveryOps;
impl RoleSet for DeliveryOps {
    fn allowed() -> &'static [UserRole] {
        &[UserRole::Admin, UserRole::Oficinista, UserRole::Domiciliario]
    }
}
