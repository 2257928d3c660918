use anyhow::anyhow;
use gatekeep_auth::{Identity, IdentityStore};
use gatekeep_core::{AppError, PaginationMeta, hash_password};
use gatekeep_db::{NewUser, UserChanges, UserQuery, UserRepository};
use tracing::{info, instrument};

use super::model::{CreateUserDto, PaginatedUsers, UpdateUserDto, UserListParams};

pub struct UserService;

fn user_not_found(id: i64) -> AppError {
    AppError::not_found(anyhow!("User with id {} not found", id))
}

impl UserService {
    #[instrument(skip(users))]
    pub async fn create_user(users: &dyn UserRepository, dto: CreateUserDto) -> Result<Identity, AppError> {
        let password_hash = hash_password(&dto.password)?;
        let user = users
            .create(NewUser {
                login: dto.email,
                password_hash,
                role: dto.role,
            })
            .await?;

        info!(user_id = user.id, role = %user.role, "user created");
        Ok(user)
    }

    #[instrument(skip(users))]
    pub async fn get_users(users: &dyn UserRepository, params: UserListParams) -> Result<PaginatedUsers, AppError> {
        let search = params
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let query = UserQuery {
            search,
            limit: params.pagination.limit(),
            offset: params.pagination.offset(),
        };
        let (page, total) = users.list(&query).await?;

        Ok(PaginatedUsers {
            data: page.into_iter().map(Into::into).collect(),
            meta: PaginationMeta::new(&params.pagination, total),
        })
    }

    #[instrument(skip(users))]
    pub async fn get_user(users: &dyn UserRepository, id: i64) -> Result<Identity, AppError> {
        users.find_by_id(id).await?.ok_or_else(|| user_not_found(id))
    }

    #[instrument(skip(users))]
    pub async fn update_user(
        users: &dyn UserRepository,
        id: i64,
        dto: UpdateUserDto,
    ) -> Result<Identity, AppError> {
        let password_hash = match dto.password.as_deref() {
            Some(password) => Some(hash_password(password)?),
            None => None,
        };
        let changes = UserChanges {
            login: dto.email,
            password_hash,
            role: dto.role,
        };

        if changes.is_empty() {
            return Self::get_user(users, id).await;
        }

        let user = users.update(id, changes).await?.ok_or_else(|| user_not_found(id))?;
        info!(user_id = user.id, "user updated");
        Ok(user)
    }

    #[instrument(skip(users))]
    pub async fn delete_user(users: &dyn UserRepository, id: i64) -> Result<(), AppError> {
        if !users.delete(id).await? {
            return Err(user_not_found(id));
        }
        info!(user_id = id, "user deleted");
        Ok(())
    }
}
