use crate::database::MongoDB;
use crate::models::User;
use crate::utils::AppError;
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::{doc, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,           // email - the user identifier
    pub iat: usize,            // issued at
    pub exp: usize,            // expiration
    pub jti: String,           // JWT ID
    pub aud: String,           // audience
    pub iss: String,           // issuer
}

/// Single auth entry point: `isRegister` selects registration vs. login.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub country: Option<String>,
    #[serde(default)]
    pub is_register: bool,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AuthResponse {
    #[schema(value_type = Object)]
    pub user: serde_json::Value,
    pub token: String,
}

fn get_jwt_secret() -> String {
    std::env::var("JWT_SECRET").unwrap_or_else(|_| "default-secret-change-me".to_string())
}

fn get_jwt_issuer() -> String {
    std::env::var("JWT_ISSUER").unwrap_or_else(|_| "goal-sync-service".to_string())
}

fn get_jwt_audience() -> String {
    std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "learning-app".to_string())
}

// Generate JWT token (30-day validity, not stored server-side)
pub fn generate_jwt(email: &str) -> Result<String, AppError> {
    let iat = Utc::now().timestamp() as usize;
    let exp = (Utc::now() + Duration::days(30)).timestamp() as usize;
    let jti = Uuid::new_v4().to_string();

    let claims = Claims {
        sub: email.to_string(),
        iat,
        exp,
        jti,
        aud: get_jwt_audience(),
        iss: get_jwt_issuer(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(get_jwt_secret().as_ref()),
    )
    .map_err(|e| AppError::InternalError(format!("Failed to generate token: {}", e)))
}

// Verify JWT token
pub fn verify_token(token: &str) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[get_jwt_audience()]);

    let mut issuers = HashSet::new();
    issuers.insert(get_jwt_issuer());
    validation.iss = Some(issuers);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(get_jwt_secret().as_ref()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
}

fn required_credentials(request: &AuthRequest) -> Result<(&str, &str), AppError> {
    let email = request
        .email
        .as_deref()
        .filter(|e| !e.is_empty())
        .ok_or_else(|| AppError::BadRequest("Email is required".to_string()))?;
    let password = request
        .password
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::BadRequest("Password is required".to_string()))?;
    Ok((email, password))
}

/// Register or log in, returning the stripped user document and a session token.
pub async fn authenticate(db: &MongoDB, request: &AuthRequest) -> Result<AuthResponse, AppError> {
    let (email, password) = required_credentials(request)?;

    if request.is_register {
        register(db, email, password, request).await
    } else {
        login(db, email, password).await
    }
}

async fn login(db: &MongoDB, email: &str, password: &str) -> Result<AuthResponse, AppError> {
    let collection = db.users();

    let user = collection
        .find_one(doc! { "email": email })
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let stored_hash = user
        .password
        .as_ref()
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

    let valid = verify(password, stored_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {}", e)))?;

    if !valid {
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = generate_jwt(&user.email)?;

    Ok(AuthResponse {
        user: serde_json::to_value(user.stripped())
            .map_err(|e| AppError::InternalError(e.to_string()))?,
        token,
    })
}

async fn register(
    db: &MongoDB,
    email: &str,
    password: &str,
    request: &AuthRequest,
) -> Result<AuthResponse, AppError> {
    let collection = db.users();

    let existing = collection
        .find_one(doc! { "email": email })
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

    if existing.is_some() {
        return Err(AppError::Conflict("User already exists".to_string()));
    }

    let hashed_password = hash(password, DEFAULT_COST)
        .map_err(|e| AppError::InternalError(format!("Failed to hash password: {}", e)))?;

    let new_user = User {
        id: None,
        email: email.to_string(),
        password: Some(hashed_password),
        name: request.name.clone(),
        country: request.country.clone(),
        goal: None,
        all_goals: vec![],
        created_at: Some(BsonDateTime::now()),
        updated_at: Some(BsonDateTime::now()),
    };

    collection
        .insert_one(&new_user)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create user: {}", e)))?;

    let token = generate_jwt(email)?;

    log::info!("✅ User registered successfully: {}", email);

    Ok(AuthResponse {
        user: serde_json::to_value(new_user.stripped())
            .map_err(|e| AppError::InternalError(e.to_string()))?,
        token,
    })
}
