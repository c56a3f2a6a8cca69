use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{info, instrument, warn};

use super::{
    models::{NewUser, UserModel},
    password::{hash_password_blocking, verify_password_blocking},
    repository::{UserRepository, DUPLICATE_EMAIL_MESSAGE},
    token::TokenConfig,
    types::{normalize_email, SignupRequest, TokenResponse},
};
use crate::shared::{AppError, AppState};

const BAD_LOGIN_MESSAGE: &str = "Incorrect email or password";
const BAD_CREDENTIALS_MESSAGE: &str = "Could not validate credentials";
const PLACEHOLDER_PASSWORD: &str = "careconnect-placeholder";

/// Registration, login and token resolution
pub struct AuthService {
    repository: Arc<dyn UserRepository + Send + Sync>,
    token_config: TokenConfig,
    hash_cost: u32,
    placeholder_hash: Arc<OnceCell<String>>,
}

impl AuthService {
    pub fn new(
        repository: Arc<dyn UserRepository + Send + Sync>,
        token_config: TokenConfig,
        hash_cost: u32,
    ) -> Self {
        Self {
            repository,
            token_config,
            hash_cost,
            placeholder_hash: Arc::new(OnceCell::new()),
        }
    }

    /// Service over the shared state; the placeholder hash is computed once per state
    pub fn from_state(state: &AppState) -> Self {
        Self {
            placeholder_hash: state.placeholder_hash.clone(),
            ..Self::new(
                state.user_repository.clone(),
                state.token_config.clone(),
                state.config.password_hash_cost,
            )
        }
    }

    /// Verifies `password` against a hash of the configured cost that no account uses
    async fn verify_placeholder(&self, password: &str) -> Result<(), AppError> {
        let cost = self.hash_cost;
        let hash = self
            .placeholder_hash
            .get_or_try_init(|| hash_password_blocking(PLACEHOLDER_PASSWORD.to_string(), cost))
            .await?;

        verify_password_blocking(password.to_string(), hash.clone()).await?;
        Ok(())
    }

    /// Creates a user with a hashed password. A registered email is a conflict.
    #[instrument(skip(self, request), fields(email = %request.email.as_str()))]
    pub async fn register(&self, request: SignupRequest) -> Result<UserModel, AppError> {
        info!("Registering user");

        if self
            .repository
            .find_by_email(request.email.as_str())
            .await?
            .is_some()
        {
            warn!("Signup rejected, email already registered");
            return Err(AppError::Conflict(DUPLICATE_EMAIL_MESSAGE.to_string()));
        }

        let hashed_password = hash_password_blocking(request.password, self.hash_cost).await?;

        // The store re-checks uniqueness, so a concurrent signup still ends in Conflict
        let user = self
            .repository
            .create_user(&NewUser {
                email: request.email.into(),
                name: request.name,
                hashed_password,
            })
            .await?;

        info!(user_id = user.id, "User registered");
        Ok(user)
    }

    /// Checks credentials and issues an access token.
    ///
    /// Unknown email and wrong password fail identically.
    #[instrument(skip(self, password))]
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<TokenResponse, AppError> {
        info!("Authenticating user");

        let email = normalize_email(email);
        let Some(user) = self.repository.find_by_email(&email).await? else {
            // Unknown emails pay the same bcrypt cost as wrong passwords
            self.verify_placeholder(password).await?;
            warn!("Login failed, unknown email");
            return Err(AppError::Unauthorized(BAD_LOGIN_MESSAGE.to_string()));
        };

        let valid =
            verify_password_blocking(password.to_string(), user.hashed_password.clone()).await?;
        if !valid {
            warn!(user_id = user.id, "Login failed, wrong password");
            return Err(AppError::Unauthorized(BAD_LOGIN_MESSAGE.to_string()));
        }

        let token = self.token_config.create_token(&user.email)?;

        info!(user_id = user.id, "Login successful");
        Ok(TokenResponse::bearer(token))
    }

    /// Resolves a bearer token to the user it was issued for
    #[instrument(skip(self, token))]
    pub async fn verify_token(&self, token: &str) -> Result<UserModel, AppError> {
        let claims = self.token_config.validate_token(token)?;

        match self.repository.find_by_email(&claims.sub).await? {
            Some(user) => Ok(user),
            None => {
                warn!("Token subject no longer exists");
                Err(AppError::Unauthorized(BAD_CREDENTIALS_MESSAGE.to_string()))
            }
        }
    }
}
