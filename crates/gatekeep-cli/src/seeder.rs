//! Fake user generation for development databases.

use std::time::Instant;

use anyhow::Result;
use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use gatekeep_auth::{Role, StoreError};
use gatekeep_core::hash_password;
use gatekeep_db::{NewUser, UserRepository};
use rayon::prelude::*;

/// Password shared by every seeded account.
pub const SEED_PASSWORD: &str = "password123";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub created: usize,
    pub skipped: usize,
}

/// Builds `count` users with role `user`. Logins embed the index so a
/// single run never collides with itself.
pub fn generate_users(count: usize, password_hash: &str) -> Vec<NewUser> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let first_name: String = FirstName().fake();
            let last_name: String = LastName().fake();
            NewUser {
                login: format!(
                    "{}.{}+{}@example.com",
                    first_name.to_lowercase(),
                    last_name.to_lowercase(),
                    idx
                ),
                password_hash: password_hash.to_string(),
                role: Role::User,
            }
        })
        .collect()
}

/// Inserts `count` fake users. Logins left over from an earlier run are
/// skipped rather than failing the whole batch.
pub async fn seed_users(store: &dyn UserRepository, count: usize) -> Result<SeedReport> {
    let start_time = Instant::now();
    println!("👥 Seeding {} users...", count);

    // Hash once; bcrypt per row would dominate the run.
    let password_hash = hash_password(SEED_PASSWORD).map_err(|e| e.error)?;
    let users = generate_users(count, &password_hash);

    let mut report = SeedReport::default();
    for user in users {
        match store.create(user).await {
            Ok(_) => report.created += 1,
            Err(StoreError::Conflict(_)) => report.skipped += 1,
            Err(e) => return Err(e.into()),
        }
    }

    println!(
        "✅ Created {} users ({} skipped) in {:.2?}",
        report.created,
        report.skipped,
        start_time.elapsed()
    );
    println!("   All seeded accounts use the password: {}", SEED_PASSWORD);
    Ok(report)
}
