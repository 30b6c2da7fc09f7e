//! Repository for the `contact_messages` table.

use enki_core::contact::{MessageStatus, STATUS_NEW, STATUS_READ, STATUS_RESPONDED};
use enki_core::pagination::page_offset;
use enki_core::search::{ilike_any, like_pattern, MESSAGE_SEARCH_COLUMNS};
use enki_core::types::DbId;
use sqlx::PgPool;

use crate::models::contact_message::{ContactMessage, CreateContactMessage, MessageFilter};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, email, phone, company, message, status, read_at, \
                        responded_at, response_note, created_at, updated_at";

/// Provides CRUD and status-workflow operations for contact messages.
pub struct ContactMessageRepo;

impl ContactMessageRepo {
    /// Insert a new message with status `new`, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateContactMessage,
    ) -> Result<ContactMessage, sqlx::Error> {
        let query = format!(
            "INSERT INTO contact_messages (name, email, phone, company, message, status)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContactMessage>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.company)
            .bind(&input.message)
            .bind(STATUS_NEW)
            .fetch_one(pool)
            .await
    }

    /// Find a message by its ID. Excludes soft-deleted rows.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ContactMessage>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM contact_messages WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, ContactMessage>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// One page of messages matching `filter`, newest first, plus the total
    /// number of matching rows.
    pub async fn list(
        pool: &PgPool,
        filter: &MessageFilter,
        page: i64,
        per_page: i64,
    ) -> Result<(Vec<ContactMessage>, i64), sqlx::Error> {
        let mut conditions = vec!["deleted_at IS NULL".to_string()];
        let mut bind_idx = 1u32;

        if filter.status.is_some() {
            conditions.push(format!("status = ${bind_idx}"));
            bind_idx += 1;
        }
        if filter.search.is_some() {
            conditions.push(ilike_any(MESSAGE_SEARCH_COLUMNS, bind_idx));
            bind_idx += 1;
        }
        let where_clause = conditions.join(" AND ");
        let pattern = filter.search.as_deref().map(like_pattern);

        let count_query = format!("SELECT COUNT(*) FROM contact_messages WHERE {where_clause}");
        let mut count_q = sqlx::query_scalar::<_, i64>(&count_query);
        if let Some(ref status) = filter.status {
            count_q = count_q.bind(status);
        }
        if let Some(ref pattern) = pattern {
            count_q = count_q.bind(pattern);
        }
        let total = count_q.fetch_one(pool).await?;

        let query = format!(
            "SELECT {COLUMNS} FROM contact_messages WHERE {where_clause}
             ORDER BY created_at DESC, id DESC
             LIMIT ${} OFFSET ${}",
            bind_idx,
            bind_idx + 1
        );
        let mut q = sqlx::query_as::<_, ContactMessage>(&query);
        if let Some(ref status) = filter.status {
            q = q.bind(status);
        }
        if let Some(ref pattern) = pattern {
            q = q.bind(pattern);
        }
        let rows = q
            .bind(per_page)
            .bind(page_offset(page, per_page))
            .fetch_all(pool)
            .await?;

        Ok((rows, total))
    }

    /// Set status `read` and refresh `read_at`.
    pub async fn mark_read(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ContactMessage>, sqlx::Error> {
        let query = format!(
            "UPDATE contact_messages SET status = $2, read_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContactMessage>(&query)
            .bind(id)
            .bind(STATUS_READ)
            .fetch_optional(pool)
            .await
    }

    /// Mark a message read only if it is still `new`.
    ///
    /// Returns `None` when the message is missing or already past `new`, so
    /// concurrent views set `read_at` at most once.
    pub async fn mark_read_if_new(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ContactMessage>, sqlx::Error> {
        let query = format!(
            "UPDATE contact_messages SET status = $2, read_at = NOW()
             WHERE id = $1 AND status = $3 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContactMessage>(&query)
            .bind(id)
            .bind(STATUS_READ)
            .bind(STATUS_NEW)
            .fetch_optional(pool)
            .await
    }

    /// Set status `responded`, refresh `responded_at`, and overwrite the
    /// response note (a `None` note clears it).
    pub async fn mark_responded(
        pool: &PgPool,
        id: DbId,
        note: Option<&str>,
    ) -> Result<Option<ContactMessage>, sqlx::Error> {
        let query = format!(
            "UPDATE contact_messages
             SET status = $2, responded_at = NOW(), response_note = $3
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContactMessage>(&query)
            .bind(id)
            .bind(STATUS_RESPONDED)
            .bind(note)
            .fetch_optional(pool)
            .await
    }

    /// Plain status update leaving the timestamps alone.
    ///
    /// `note` is `None` to keep the stored note, `Some(None)` to clear it and
    /// `Some(Some(_))` to replace it.
    pub async fn reset_status(
        pool: &PgPool,
        id: DbId,
        status: MessageStatus,
        note: Option<Option<&str>>,
    ) -> Result<Option<ContactMessage>, sqlx::Error> {
        let query = format!(
            "UPDATE contact_messages
             SET status = $2,
                 response_note = CASE WHEN $4 THEN $3 ELSE response_note END
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContactMessage>(&query)
            .bind(id)
            .bind(status.as_str())
            .bind(note.flatten())
            .bind(note.is_some())
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a message by ID. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE contact_messages SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count live messages.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM contact_messages WHERE deleted_at IS NULL")
            .fetch_one(pool)
            .await
    }

    /// Count live messages with the given status.
    pub async fn count_by_status(pool: &PgPool, status: MessageStatus) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM contact_messages WHERE deleted_at IS NULL AND status = $1",
        )
        .bind(status.as_str())
        .fetch_one(pool)
        .await
    }

    /// The `limit` most recent live messages.
    pub async fn recent(pool: &PgPool, limit: i64) -> Result<Vec<ContactMessage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM contact_messages WHERE deleted_at IS NULL
             ORDER BY created_at DESC, id DESC LIMIT $1"
        );
        sqlx::query_as::<_, ContactMessage>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
