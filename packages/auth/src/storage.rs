// ABOUTME: Account storage layer using SQLite
// ABOUTME: Sign-up and sign-in for donors and receivers with hashed passwords

use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::{debug, info, warn};

use givelink_core::{generate_id, IdPrefix};
use givelink_storage::StorageError;

use crate::error::{AuthError, AuthResult};
use crate::password::{hash_password, verify_password};
use crate::types::{normalize_email, Credentials, Donor, DonorSignup, Receiver, ReceiverSignup};

pub struct AccountStorage {
    pool: SqlitePool,
}

impl AccountStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_donor(&self, signup: DonorSignup) -> AuthResult<Donor> {
        let email = signup.validate()?;
        let id = generate_id(IdPrefix::Donor);
        let password_hash = hash_password(&signup.password).await?;
        let now = Utc::now();

        debug!("Creating donor account: {}", id);

        sqlx::query(
            r#"
            INSERT INTO donors (id, name, email, password_hash, number, address, donor_type, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(signup.name.trim())
        .bind(&email)
        .bind(&password_hash)
        .bind(signup.number.trim())
        .bind(signup.address.trim())
        .bind(signup.donor_type)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| duplicate_email(e, &email))?;

        info!("Registered donor {}", id);
        self.get_donor(&id).await
    }

    pub async fn create_receiver(&self, signup: ReceiverSignup) -> AuthResult<Receiver> {
        let email = signup.validate()?;
        let id = generate_id(IdPrefix::Receiver);
        let password_hash = hash_password(&signup.password).await?;
        let now = Utc::now();

        debug!("Creating receiver account: {}", id);

        sqlx::query(
            r#"
            INSERT INTO receivers (id, name, email, password_hash, number, address, receiver_type, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(signup.name.trim())
        .bind(&email)
        .bind(&password_hash)
        .bind(trimmed(&signup.number))
        .bind(trimmed(&signup.address))
        .bind(signup.receiver_type)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| duplicate_email(e, &email))?;

        info!("Registered receiver {}", id);
        self.get_receiver(&id).await
    }

    pub async fn get_donor(&self, id: &str) -> AuthResult<Donor> {
        let row = sqlx::query("SELECT * FROM donors WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::not_found_as("Donor"))?;
        Ok(row_to_donor(&row)?)
    }

    pub async fn get_receiver(&self, id: &str) -> AuthResult<Receiver> {
        let row = sqlx::query("SELECT * FROM receivers WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::not_found_as("Receiver"))?;
        Ok(row_to_receiver(&row)?)
    }

    pub async fn authenticate_donor(&self, credentials: &Credentials) -> AuthResult<Donor> {
        let row = self.verify_credentials("donors", credentials).await?;
        Ok(row_to_donor(&row)?)
    }

    pub async fn authenticate_receiver(&self, credentials: &Credentials) -> AuthResult<Receiver> {
        let row = self.verify_credentials("receivers", credentials).await?;
        Ok(row_to_receiver(&row)?)
    }

    /// Fetch the account row for `credentials` if the password matches.
    ///
    /// Unknown emails and wrong passwords produce the same error.
    async fn verify_credentials(
        &self,
        table: &'static str,
        credentials: &Credentials,
    ) -> AuthResult<SqliteRow> {
        let email = normalize_email(&credentials.email).map_err(|_| AuthError::InvalidCredentials)?;

        let row = sqlx::query(&format!("SELECT * FROM {} WHERE email = ?", table))
            .bind(&email)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            debug!("Sign-in for unknown email in {}", table);
            return Err(AuthError::InvalidCredentials);
        };

        let password_hash: String = row.try_get("password_hash")?;
        if !verify_password(&credentials.password, &password_hash).await? {
            warn!("Failed sign-in attempt against {}", table);
            return Err(AuthError::InvalidCredentials);
        }

        Ok(row)
    }
}

fn trimmed(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn duplicate_email(err: sqlx::Error, email: &str) -> AuthError {
    match err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AuthError::EmailTaken(email.to_string())
        }
        other => AuthError::from(other),
    }
}

fn row_to_donor(row: &SqliteRow) -> Result<Donor, StorageError> {
    Ok(Donor {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        number: row.try_get("number")?,
        address: row.try_get("address")?,
        donor_type: row.try_get("donor_type")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn row_to_receiver(row: &SqliteRow) -> Result<Receiver, StorageError> {
    Ok(Receiver {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        number: row.try_get("number")?,
        address: row.try_get("address")?,
        receiver_type: row.try_get("receiver_type")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
