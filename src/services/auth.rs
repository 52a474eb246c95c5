// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{AuthResponse, Claims, LoginUserPayload, RegisterUserPayload, User, UserRole},
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
    pool: SqlitePool,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String, pool: SqlitePool) -> Self {
        Self { user_repo, jwt_secret, pool }
    }

    // Registro público. Siempre crea clientes: el rol no viene en el
    // payload y no hay forma de pedir otro por esta vía.
    pub async fn register_client(
        &self,
        payload: &RegisterUserPayload,
    ) -> Result<AuthResponse, AppError> {
        // 1. Hashing (fuera de la transacción, no toca la base)
        let password_clone = payload.password.to_owned();
        let hashed_password = tokio::task::spawn_blocking(move || {
            hash(&password_clone, bcrypt::DEFAULT_COST)
        })
            .await
            .map_err(|e| anyhow::anyhow!("Falló la tarea de hashing: {}", e))?
            ?;

        // 2. Crear el usuario dentro de una transacción
        let mut tx = self.pool.begin().await?;

        let new_user = self.user_repo
            .create_user(
                &mut *tx,
                &Uuid::new_v4().to_string(),
                &payload.email,
                &hashed_password,
                &payload.name,
                UserRole::Cliente,
                Some(payload.address.as_str()),
                Utc::now(),
            )
            .await?; // Si falla aquí, el tx hace rollback solo al salir del scope

        tx.commit().await?;

        // 3. Generar el token para dejar la sesión iniciada
        let token = self.create_token(&new_user.id)?;
        Ok(AuthResponse { token, user: new_user })
    }

    pub async fn login_user(&self, payload: &LoginUserPayload) -> Result<AuthResponse, AppError> {
        // 1. Buscar el usuario. Email desconocido y contraseña mala se
        // responden igual para no revelar cuál de los dos falló.
        let user = self.user_repo
            .find_by_email(&payload.email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = payload.password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // 2. Verificación de bcrypt en un thread aparte
        let is_password_valid = tokio::task::spawn_blocking(move || {
            verify(&password_clone, &password_hash_clone)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falló la tarea de verificación de contraseña: {}", e))?
        ?;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        // 3. Registrar el último login: mejor esfuerzo, un fallo aquí no
        // tumba el inicio de sesión.
        if let Err(e) = self.user_repo.update_last_login(&user.id, Utc::now()).await {
            tracing::warn!("⚠️ No se pudo registrar el último login de {}: {}", user.id, e);
        }

        let token = self.create_token(&user.id)?;
        Ok(AuthResponse { token, user })
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        self.user_repo
            .find_by_id(&token_data.claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    fn create_token(&self, user_id: &str) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: user_id.to_owned(),
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}
