// src/db/user_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite, SqlitePool};

use crate::common::error::AppError;
use crate::models::auth::{User, UserRole};

// El repositorio de usuarios, responsable de todas las interacciones con
// la tabla 'users'.
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // Busca un usuario por su email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    // Busca un usuario por su ID
    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    // Crea un nuevo usuario.
    // Con tratamiento específico para emails duplicados: el único índice
    // UNIQUE de la tabla es el del email, así que cualquier violación de
    // unicidad aquí significa email repetido.
    pub async fn create_user<'e, E>(
        &self,
        executor: E,
        id: &str,
        email: &str,
        password_hash: &str,
        name: &str,
        role: UserRole,
        address: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, password_hash, name, role, address, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(email)
        .bind(password_hash)
        .bind(name)
        .bind(role)
        .bind(address)
        .bind(now)
        .bind(now)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::EmailAlreadyExists;
                }
            }
            e.into()
        })?;

        Ok(user)
    }

    // Lista completa, los registros más nuevos primero
    pub async fn list_all(&self) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    // Lista solo los usuarios de un rol (clientes, domiciliarios, etc.)
    pub async fn list_by_role(&self, role: UserRole) -> Result<Vec<User>, AppError> {
        let users =
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE role = $1 ORDER BY name ASC")
                .bind(role)
                .fetch_all(&self.pool)
                .await?;
        Ok(users)
    }

    // Marca la hora del último inicio de sesión. No distingue si el
    // usuario existe: el caller lo trata como mejor-esfuerzo.
    pub async fn update_last_login(&self, id: &str, when: DateTime<Utc>) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET last_login = $2, updated_at = $2 WHERE id = $1")
            .bind(id)
            .bind(when)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // Cambia el rol de un usuario
    pub async fn update_role(
        &self,
        id: &str,
        role: UserRole,
        now: DateTime<Utc>,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET role = $2, updated_at = $3 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(role)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::UserNotFound)?;

        Ok(user)
    }
}
