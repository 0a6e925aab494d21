//! Authentication service for user registration, login, and token management

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use shared::models::{Profile, UserRole};
use shared::validation::{validate_email, validate_non_empty, validate_password};

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: PgPool,
    jwt_secret: String,
    access_token_expiry: i64,
    refresh_token_expiry: i64,
}

/// Input for registering a new account
#[derive(Debug, Deserialize)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: UserRole,
}

/// Input for logging in
#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Input for refreshing an access token
#[derive(Debug, Deserialize)]
pub struct RefreshInput {
    pub refresh_token: String,
}

/// Authentication tokens plus the profile they belong to
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: Profile,
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // User ID
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(db: PgPool, config: &Config) -> Self {
        Self {
            db,
            jwt_secret: config.jwt.secret.clone(),
            access_token_expiry: config.jwt.access_token_expiry,
            refresh_token_expiry: config.jwt.refresh_token_expiry,
        }
    }

    /// Register a new manufacturer or pharmacist account
    pub async fn register(&self, input: RegisterInput) -> AppResult<AuthResponse> {
        validate_email(&input.email).map_err(|msg| AppError::validation("email", msg))?;
        validate_password(&input.password).map_err(|msg| AppError::validation("password", msg))?;
        validate_non_empty(&input.full_name)
            .map_err(|_| AppError::validation("full_name", "Full name cannot be empty"))?;

        // Check for an existing account
        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM profiles WHERE email = $1",
        )
        .bind(&input.email)
        .fetch_one(&self.db)
        .await?;

        if existing > 0 {
            return Err(AppError::DuplicateEntry("email".to_string()));
        }

        let password_hash = hash(&input.password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        let row = sqlx::query_as::<_, (Uuid, String, String, String, chrono::DateTime<Utc>)>(
            r#"
            INSERT INTO profiles (email, password_hash, full_name, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, full_name, role, created_at
            "#,
        )
        .bind(&input.email)
        .bind(&password_hash)
        .bind(input.full_name.trim())
        .bind(input.role.as_str())
        .fetch_one(&self.db)
        .await?;

        let profile = Self::profile_from_row(row)?;
        self.issue_tokens(profile)
    }

    /// Authenticate with email and password
    pub async fn login(&self, input: LoginInput) -> AppResult<AuthResponse> {
        let row = sqlx::query_as::<_, (Uuid, String, String, String, String, chrono::DateTime<Utc>)>(
            r#"
            SELECT id, email, password_hash, full_name, role, created_at
            FROM profiles
            WHERE email = $1
            "#,
        )
        .bind(&input.email)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

        let valid = verify(&input.password, &row.2)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;
        if !valid {
            return Err(AppError::InvalidCredentials);
        }

        let profile = Self::profile_from_row((row.0, row.1, row.3, row.4, row.5))?;
        self.issue_tokens(profile)
    }

    /// Exchange a refresh token for a fresh token pair
    pub async fn refresh(&self, input: RefreshInput) -> AppResult<AuthResponse> {
        let claims = decode::<Claims>(
            &input.refresh_token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
            _ => AppError::InvalidToken,
        })?
        .claims;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::InvalidToken)?;

        let row = sqlx::query_as::<_, (Uuid, String, String, String, chrono::DateTime<Utc>)>(
            "SELECT id, email, full_name, role, created_at FROM profiles WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        let profile = Self::profile_from_row(row)?;
        self.issue_tokens(profile)
    }

    fn profile_from_row(
        row: (Uuid, String, String, String, chrono::DateTime<Utc>),
    ) -> AppResult<Profile> {
        let role = UserRole::from_str(&row.3)
            .ok_or_else(|| AppError::Internal(format!("Unknown role in storage: {}", row.3)))?;
        Ok(Profile {
            id: row.0,
            email: row.1,
            full_name: row.2,
            role,
            created_at: row.4,
        })
    }

    fn issue_tokens(&self, profile: Profile) -> AppResult<AuthResponse> {
        let access_token = self.encode_token(&profile, self.access_token_expiry)?;
        let refresh_token = self.encode_token(&profile, self.refresh_token_expiry)?;

        Ok(AuthResponse {
            user: profile,
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_expiry,
        })
    }

    fn encode_token(&self, profile: &Profile, expiry_secs: i64) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: profile.id.to_string(),
            role: profile.role.as_str().to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(expiry_secs)).timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token encoding failed: {}", e)))
    }
}
