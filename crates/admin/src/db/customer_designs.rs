//! Customer design repository.
//!
//! Queries are built at runtime with `sqlx::QueryBuilder` so the list
//! filters can be combined freely.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use product_configurator_core::{DesignStatus, Email};

use super::RepositoryError;
use crate::models::customer_design::{
    CustomerDesign, CustomerDesignFilter, CustomerDesignUpdate, DesignFiles, NewCustomerDesign,
    generate_design_id,
};

const COLUMNS: &str = "id, customer_id, customer_email, product_id, product_title, design_name, \
    decoration_type, status, notes, front_file_id, back_file_id, left_file_id, right_file_id, \
    transforms, quantities, created_at, updated_at";

/// Largest page a caller may request.
const MAX_LIMIT: i64 = 200;

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `customer_designs` queries.
#[derive(Debug, sqlx::FromRow)]
struct CustomerDesignRow {
    id: String,
    customer_id: Option<String>,
    customer_email: Option<String>,
    product_id: Option<String>,
    product_title: Option<String>,
    design_name: Option<String>,
    decoration_type: String,
    status: DesignStatus,
    notes: Option<String>,
    front_file_id: Option<String>,
    back_file_id: Option<String>,
    left_file_id: Option<String>,
    right_file_id: Option<String>,
    transforms: Option<serde_json::Value>,
    quantities: Option<serde_json::Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CustomerDesignRow> for CustomerDesign {
    type Error = RepositoryError;

    fn try_from(row: CustomerDesignRow) -> Result<Self, Self::Error> {
        let customer_email = row
            .customer_email
            .as_deref()
            .map(Email::parse)
            .transpose()
            .map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
            })?;

        Ok(Self {
            id: row.id,
            customer_id: row.customer_id,
            customer_email,
            product_id: row.product_id,
            product_title: row.product_title,
            design_name: row.design_name,
            decoration_type: row.decoration_type,
            status: row.status,
            notes: row.notes,
            files: DesignFiles {
                front_file_id: row.front_file_id,
                back_file_id: row.back_file_id,
                left_file_id: row.left_file_id,
                right_file_id: row.right_file_id,
            },
            transforms: row.transforms,
            quantities: row.quantities,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for customer design rows.
pub struct CustomerDesignRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerDesignRepository<'a> {
    /// Create a new customer design repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List designs matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn list(
        &self,
        filter: &CustomerDesignFilter,
    ) -> Result<Vec<CustomerDesign>, RepositoryError> {
        let mut query = list_query(filter);
        let rows: Vec<CustomerDesignRow> = query.build_query_as().fetch_all(self.pool).await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get a design by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get(&self, id: &str) -> Result<Option<CustomerDesign>, RepositoryError> {
        let row: Option<CustomerDesignRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM configurator.customer_designs WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Insert a design, generating its id when none is given.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the id already exists.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        design: NewCustomerDesign,
    ) -> Result<CustomerDesign, RepositoryError> {
        let id = design.id.unwrap_or_else(generate_design_id);

        let row: CustomerDesignRow = sqlx::query_as(&format!(
            r"
            INSERT INTO configurator.customer_designs (
                id, customer_id, customer_email, product_id, product_title, design_name,
                decoration_type, status, notes, front_file_id, back_file_id, left_file_id,
                right_file_id, transforms, quantities
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING {COLUMNS}
            "
        ))
        .bind(&id)
        .bind(design.customer_id)
        .bind(design.customer_email.map(String::from))
        .bind(design.product_id)
        .bind(design.product_title)
        .bind(design.design_name)
        .bind(design.decoration_type)
        .bind(design.status)
        .bind(design.notes)
        .bind(design.files.front_file_id)
        .bind(design.files.back_file_id)
        .bind(design.files.left_file_id)
        .bind(design.files.right_file_id)
        .bind(design.transforms)
        .bind(design.quantities)
        .fetch_one(self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                RepositoryError::Conflict(format!("design {id} already exists"))
            }
            other => RepositoryError::Database(other),
        })?;

        row.try_into()
    }

    /// Update the provided fields of a design.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no design has this id.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update(
        &self,
        id: &str,
        update: CustomerDesignUpdate,
    ) -> Result<CustomerDesign, RepositoryError> {
        self.apply_update(id, None, update)
            .await?
            .ok_or(RepositoryError::NotFound)?
            .try_into()
    }

    /// Update a design only while its status is still `expected`.
    ///
    /// The status check and the write happen in one statement, so a
    /// concurrent status change makes this fail instead of being overwritten.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no design has this id.
    /// Returns `RepositoryError::Conflict` if the status is no longer `expected`.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update_if_status(
        &self,
        id: &str,
        expected: DesignStatus,
        update: CustomerDesignUpdate,
    ) -> Result<CustomerDesign, RepositoryError> {
        match self.apply_update(id, Some(expected), update).await? {
            Some(row) => row.try_into(),
            None => Err(missed_update(id, self.get(id).await?.is_some())),
        }
    }

    async fn apply_update(
        &self,
        id: &str,
        expected: Option<DesignStatus>,
        update: CustomerDesignUpdate,
    ) -> Result<Option<CustomerDesignRow>, RepositoryError> {
        let row = sqlx::query_as(&update_sql())
            .bind(id)
            .bind(update.customer_id)
            .bind(update.customer_email.map(String::from))
            .bind(update.product_id)
            .bind(update.product_title)
            .bind(update.design_name)
            .bind(update.decoration_type)
            .bind(update.status)
            .bind(update.notes)
            .bind(update.files.front_file_id)
            .bind(update.files.back_file_id)
            .bind(update.files.left_file_id)
            .bind(update.files.right_file_id)
            .bind(update.transforms)
            .bind(update.quantities)
            .bind(expected)
            .fetch_optional(self.pool)
            .await?;
        Ok(row)
    }

    /// Delete a design.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no design has this id.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM configurator.customer_designs WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

/// `UPDATE` for one row. A non-null `$16` must equal the current status.
fn update_sql() -> String {
    format!(
        r"
        UPDATE configurator.customer_designs SET
            customer_id = COALESCE($2, customer_id),
            customer_email = COALESCE($3, customer_email),
            product_id = COALESCE($4, product_id),
            product_title = COALESCE($5, product_title),
            design_name = COALESCE($6, design_name),
            decoration_type = COALESCE($7, decoration_type),
            status = COALESCE($8, status),
            notes = COALESCE($9, notes),
            front_file_id = COALESCE($10, front_file_id),
            back_file_id = COALESCE($11, back_file_id),
            left_file_id = COALESCE($12, left_file_id),
            right_file_id = COALESCE($13, right_file_id),
            transforms = COALESCE($14, transforms),
            quantities = COALESCE($15, quantities),
            updated_at = NOW()
        WHERE id = $1 AND ($16::design_status IS NULL OR status = $16)
        RETURNING {COLUMNS}
        "
    )
}

/// Error for a guarded update that matched no row.
fn missed_update(id: &str, exists: bool) -> RepositoryError {
    if exists {
        RepositoryError::Conflict(format!("design {id} changed status during the update"))
    } else {
        RepositoryError::NotFound
    }
}

/// `SELECT` for [`CustomerDesignRepository::list`].
fn list_query(filter: &CustomerDesignFilter) -> QueryBuilder<'_, Postgres> {
    let mut query = QueryBuilder::new(format!(
        "SELECT {COLUMNS} FROM configurator.customer_designs WHERE TRUE"
    ));

    if let Some(customer_id) = &filter.customer_id {
        query.push(" AND customer_id = ").push_bind(customer_id);
    }
    if let Some(email) = &filter.customer_email {
        query
            .push(" AND lower(customer_email) = lower(")
            .push_bind(email.trim())
            .push(")");
    }
    if let Some(product_id) = &filter.product_id {
        query.push(" AND product_id = ").push_bind(product_id);
    }
    if let Some(status) = filter.status {
        query.push(" AND status = ").push_bind(status);
    }

    query
        .push(" ORDER BY created_at DESC LIMIT ")
        .push_bind(filter.limit.clamp(1, MAX_LIMIT))
        .push(" OFFSET ")
        .push_bind(filter.offset.max(0));

    query
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_without_filters() {
        let filter = CustomerDesignFilter::default();
        let query = list_query(&filter);
        assert!(query.sql().ends_with(
            "WHERE TRUE ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        ));
    }

    #[test]
    fn test_list_query_binds_each_filter() {
        let filter = CustomerDesignFilter {
            customer_id: Some("42".to_string()),
            customer_email: Some("Jane@Example.com".to_string()),
            status: Some(DesignStatus::Draft),
            ..CustomerDesignFilter::default()
        };
        let query = list_query(&filter);
        let sql = query.sql();
        assert!(sql.contains("customer_id = $1"));
        assert!(sql.contains("lower(customer_email) = lower($2)"));
        assert!(sql.contains("status = $3"));
        assert!(sql.contains("LIMIT $4 OFFSET $5"));
        assert!(!sql.contains("product_id ="));
    }

    #[test]
    fn test_guarded_update_checks_status() {
        let sql = update_sql();
        assert!(sql.contains("WHERE id = $1 AND ($16::design_status IS NULL OR status = $16)"));
        assert!(sql.contains("status = COALESCE($8, status)"));
        assert!(sql.contains("RETURNING id, customer_id"));
    }

    #[test]
    fn test_missed_update() {
        assert!(matches!(missed_update("design_1_a", false), RepositoryError::NotFound));
        assert!(matches!(
            missed_update("design_1_a", true),
            RepositoryError::Conflict(m) if m == "design design_1_a changed status during the update"
        ));
    }

    #[test]
    fn test_row_with_bad_email_is_corrupt() {
        let row = CustomerDesignRow {
            id: "design_1_a".to_string(),
            customer_id: None,
            customer_email: Some("not-an-email".to_string()),
            product_id: None,
            product_title: None,
            design_name: None,
            decoration_type: "Screenprint".to_string(),
            status: DesignStatus::Draft,
            notes: None,
            front_file_id: None,
            back_file_id: None,
            left_file_id: None,
            right_file_id: None,
            transforms: None,
            quantities: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let result: Result<CustomerDesign, _> = row.try_into();
        assert!(matches!(result, Err(RepositoryError::DataCorruption(_))));
    }
}
