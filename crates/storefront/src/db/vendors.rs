//! Vendor application repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;

use teknokalakal_core::{Address, UserId, VendorId, VendorStatus};

use super::RepositoryError;
use crate::models::product::ImageRef;
use crate::models::vendor::{BusinessInfo, VendorApplication};

const VENDOR_COLUMNS: &str = "id, user_id, business_name, business_description, \
     street_address, barangay, municipality, province, postal_code, phone, email, \
     certifications, status, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct VendorRow {
    id: i32,
    user_id: i32,
    business_name: String,
    business_description: String,
    street_address: String,
    barangay: String,
    municipality: String,
    province: String,
    postal_code: String,
    phone: String,
    email: String,
    certifications: Json<Vec<ImageRef>>,
    status: VendorStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<VendorRow> for VendorApplication {
    fn from(row: VendorRow) -> Self {
        Self {
            id: VendorId::new(row.id),
            user_id: UserId::new(row.user_id),
            business: BusinessInfo {
                name: row.business_name,
                description: row.business_description,
                address: Address {
                    street_address: row.street_address,
                    barangay: row.barangay,
                    municipality: row.municipality,
                    province: row.province,
                    postal_code: row.postal_code,
                },
                phone: row.phone,
                email: row.email,
            },
            certifications: row.certifications.0,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for vendor application operations.
pub struct VendorRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> VendorRepository<'a> {
    /// Create a new vendor repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// A user's applications, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<VendorApplication>, RepositoryError> {
        let rows = sqlx::query_as::<_, VendorRow>(&format!(
            "SELECT {VENDOR_COLUMNS} FROM shop.vendor_application
             WHERE user_id = $1
             ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(VendorApplication::from).collect())
    }

    /// All applications, newest first (admin surface).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<VendorApplication>, RepositoryError> {
        let rows = sqlx::query_as::<_, VendorRow>(&format!(
            "SELECT {VENDOR_COLUMNS} FROM shop.vendor_application ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(VendorApplication::from).collect())
    }

    /// Get one application.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: VendorId) -> Result<Option<VendorApplication>, RepositoryError> {
        let row = sqlx::query_as::<_, VendorRow>(&format!(
            "SELECT {VENDOR_COLUMNS} FROM shop.vendor_application WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(VendorApplication::from))
    }

    /// Submit a new application with status `pending`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        user_id: UserId,
        business: &BusinessInfo,
        certifications: &[ImageRef],
    ) -> Result<VendorApplication, RepositoryError> {
        let row = sqlx::query_as::<_, VendorRow>(&format!(
            "INSERT INTO shop.vendor_application
                 (user_id, business_name, business_description,
                  street_address, barangay, municipality, province, postal_code,
                  phone, email, certifications)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {VENDOR_COLUMNS}"
        ))
        .bind(user_id)
        .bind(&business.name)
        .bind(&business.description)
        .bind(&business.address.street_address)
        .bind(&business.address.barangay)
        .bind(&business.address.municipality)
        .bind(&business.address.province)
        .bind(&business.address.postal_code)
        .bind(&business.phone)
        .bind(&business.email)
        .bind(Json(certifications))
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Delete a user's own application.
    ///
    /// # Returns
    ///
    /// `true` if a row was deleted, `false` when the application does not
    /// exist or belongs to someone else.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_owned(
        &self,
        id: VendorId,
        user_id: UserId,
    ) -> Result<bool, RepositoryError> {
        let result =
            sqlx::query("DELETE FROM shop.vendor_application WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(user_id)
                .execute(self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Approve or reject an application (admin surface).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the application doesn't exist.
    pub async fn set_status(
        &self,
        id: VendorId,
        status: VendorStatus,
    ) -> Result<VendorApplication, RepositoryError> {
        let row = sqlx::query_as::<_, VendorRow>(&format!(
            "UPDATE shop.vendor_application
             SET status = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {VENDOR_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(self.pool)
        .await?;

        row.map(VendorApplication::from)
            .ok_or(RepositoryError::NotFound)
    }
}
