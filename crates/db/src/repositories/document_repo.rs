//! Repository for the `documents` table (report files on an overview).

use sqlx::PgPool;

use lastmile_core::types::DbId;

use crate::models::document::{CreateDocument, Document, UpdateDocument};

/// Column list for `documents` queries.
const DOCUMENT_COLUMNS: &str = "\
    id, overview_id, name, document_path, description, date, created_at, updated_at";

/// Provides CRUD operations for documents.
pub struct DocumentRepo;

impl DocumentRepo {
    /// Create a document under an overview.
    pub async fn create(
        pool: &PgPool,
        overview_id: DbId,
        new: &CreateDocument,
    ) -> Result<Document, sqlx::Error> {
        let query = format!(
            "INSERT INTO documents (overview_id, name, document_path, description, date) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {DOCUMENT_COLUMNS}"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(overview_id)
            .bind(&new.name)
            .bind(&new.document_path)
            .bind(&new.description)
            .bind(new.date)
            .fetch_one(pool)
            .await
    }

    /// Find a document by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Document>, sqlx::Error> {
        let query = format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = $1");
        sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List an overview's documents, newest dated first.
    pub async fn list_for_overview(
        pool: &PgPool,
        overview_id: DbId,
    ) -> Result<Vec<Document>, sqlx::Error> {
        let query = format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents \
             WHERE overview_id = $1 \
             ORDER BY date DESC NULLS LAST, id DESC"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(overview_id)
            .fetch_all(pool)
            .await
    }

    /// Update a document.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateDocument,
    ) -> Result<Option<Document>, sqlx::Error> {
        let query = format!(
            "UPDATE documents SET \
                 name = COALESCE($2, name), \
                 document_path = COALESCE($3, document_path), \
                 description = COALESCE($4, description), \
                 date = COALESCE($5, date) \
             WHERE id = $1 \
             RETURNING {DOCUMENT_COLUMNS}"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .bind(input.name.as_deref())
            .bind(input.document_path.as_deref())
            .bind(input.description.as_deref())
            .bind(input.date)
            .fetch_optional(pool)
            .await
    }

    /// Delete a document. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
