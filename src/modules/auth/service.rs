use gatekeep_auth::{Credential, Identity, Role, SessionIssuer};
use gatekeep_core::{AppError, hash_password};
use gatekeep_db::{NewUser, UserRepository};
use tracing::{info, instrument};

use super::model::{LoginRequest, RegisterRequest, TokenResponse};

pub struct AuthService;

impl AuthService {
    #[instrument(skip(issuer))]
    pub async fn login(issuer: &SessionIssuer, dto: LoginRequest) -> Result<TokenResponse, AppError> {
        let credential = Credential {
            login: dto.email,
            secret: dto.password,
        };
        let token = issuer.login(&credential).await?;
        Ok(TokenResponse { token })
    }

    /// Self-service sign-up. Always creates a plain `user`.
    #[instrument(skip(users))]
    pub async fn register(users: &dyn UserRepository, dto: RegisterRequest) -> Result<Identity, AppError> {
        let password_hash = hash_password(&dto.password)?;
        let user = users
            .create(NewUser {
                login: dto.email,
                password_hash,
                role: Role::User,
            })
            .await?;

        info!(user_id = user.id, "user registered");
        Ok(user)
    }
}
