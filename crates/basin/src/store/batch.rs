//! Generic idempotent batch persistence.
//!
//! `upsert_batch` is the single write discipline every sync step goes
//! through: one chunked lookup of already-stored identifiers, in-batch
//! deduplication (a later record with the same identifier overwrites an
//! earlier one, since upstream pagination can repeat rows at page
//! boundaries), then one batched insert of the unseen remainder.
//!
//! Calling `upsert_batch` twice with an identical batch is idempotent - the
//! second call inserts zero rows and reports `saved = 0`.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QuerySelect, TryGetable, Value,
};

use crate::entity;
use crate::sync::SyncCount;

use super::errors::{Result, StoreError};

/// Maximum identifiers per existence-lookup query.
const LOOKUP_CHUNK: usize = 500;

/// Maximum rows per batched insert. Each chunk is its own statement; with
/// SQLite WAL this keeps transaction overhead low without unbounded
/// parameter lists.
const INSERT_CHUNK: usize = 500;

/// Number of retry attempts for transient database write errors.
const WRITE_RETRY_ATTEMPTS: u32 = 3;

/// Initial backoff delay in milliseconds for write retries (doubles each
/// attempt).
const WRITE_RETRY_BACKOFF_MS: u64 = 100;

/// An entity whose rows are keyed by an upstream-assigned identifier.
pub trait SyncEntity: EntityTrait {
    /// Key type of the upstream identifier column.
    type SourceId: Into<Value> + TryGetable + Eq + Hash + Clone + Send + Sync;

    /// Column holding the upstream identifier.
    fn source_id_column() -> Self::Column;
}

/// An entity carrying a `processed_at` marker used by secondary-sync steps
/// to find rows whose children have not yet been fetched.
pub trait TracksProcessing: SyncEntity {
    fn processed_at_column() -> Self::Column;
}

/// Insert the unseen records of `batch`, reporting fetched/saved/skipped.
///
/// The batch is a list of `(source_id, active_model)` pairs in fetch order.
/// Records whose identifier is already stored are skipped; duplicates within
/// the batch collapse to the last occurrence before the insert.
///
/// # Errors
/// Returns `StoreError::Database` if the lookup or insert fails after
/// retries; the caller decides whether that aborts the step or folds into a
/// zero-count.
pub async fn upsert_batch<E, A>(
    db: &DatabaseConnection,
    batch: Vec<(E::SourceId, A)>,
) -> Result<SyncCount>
where
    E: SyncEntity,
    A: ActiveModelTrait<Entity = E> + Clone + Send + Sync,
    <E as EntityTrait>::Model: sea_orm::IntoActiveModel<A>,
{
    let total = batch.len();
    if total == 0 {
        return Ok(SyncCount::empty());
    }

    // In-batch dedup, later record wins; `order` keeps first-seen order so
    // inserts stay deterministic.
    let mut deduped: HashMap<E::SourceId, A> = HashMap::with_capacity(total);
    let mut order: Vec<E::SourceId> = Vec::with_capacity(total);
    for (id, model) in batch {
        if deduped.insert(id.clone(), model).is_none() {
            order.push(id);
        }
    }

    // One lookup (chunked) for already-stored identifiers.
    let mut existing: HashSet<E::SourceId> = HashSet::new();
    for chunk in order.chunks(LOOKUP_CHUNK) {
        let found: Vec<E::SourceId> = E::find()
            .select_only()
            .column(E::source_id_column())
            .filter(E::source_id_column().is_in(chunk.iter().cloned()))
            .into_tuple()
            .all(db)
            .await?;
        existing.extend(found);
    }

    let mut to_insert: Vec<A> = Vec::with_capacity(order.len());
    for id in &order {
        if !existing.contains(id)
            && let Some(model) = deduped.remove(id)
        {
            to_insert.push(model);
        }
    }

    let saved = to_insert.len();
    let mut remaining = to_insert;
    while !remaining.is_empty() {
        let tail = if remaining.len() > INSERT_CHUNK {
            remaining.split_off(INSERT_CHUNK)
        } else {
            Vec::new()
        };
        insert_chunk_with_retry::<E, A>(db, remaining).await?;
        remaining = tail;
    }

    tracing::debug!(total, saved, skipped = total - saved, "batch upsert");

    Ok(SyncCount::new(total, saved))
}

/// Set the `processed_at` marker on one row.
///
/// Callers only invoke this after the corresponding child-fetch step
/// reported success, so a transient failure leaves the marker unset and the
/// row eligible for retry on the next sync.
pub async fn mark_processed<E>(db: &DatabaseConnection, id: E::SourceId) -> Result<()>
where
    E: TracksProcessing,
{
    let now = chrono::Utc::now().fixed_offset();
    E::update_many()
        .col_expr(E::processed_at_column(), Expr::value(now))
        .filter(E::source_id_column().eq(id))
        .exec(db)
        .await?;
    Ok(())
}

/// Insert one chunk, retrying transient errors with doubling backoff.
async fn insert_chunk_with_retry<E, A>(db: &DatabaseConnection, models: Vec<A>) -> Result<()>
where
    E: SyncEntity,
    A: ActiveModelTrait<Entity = E> + Clone + Send + Sync,
    <E as EntityTrait>::Model: sea_orm::IntoActiveModel<A>,
{
    if models.is_empty() {
        return Ok(());
    }

    let mut backoff_ms = WRITE_RETRY_BACKOFF_MS;
    let mut last_error: Option<StoreError> = None;

    for attempt in 0..=WRITE_RETRY_ATTEMPTS {
        match E::insert_many(models.clone()).exec_without_returning(db).await {
            Ok(_) => return Ok(()),
            Err(e) => {
                if is_retryable_db_error(&e) && attempt < WRITE_RETRY_ATTEMPTS {
                    tracing::warn!(
                        attempt = attempt + 1,
                        backoff_ms,
                        error = %e,
                        "batch insert failed, retrying"
                    );
                    tokio::time::sleep(tokio::time::Duration::from_millis(backoff_ms)).await;
                    backoff_ms *= 2;
                    last_error = Some(e.into());
                } else {
                    return Err(e.into());
                }
            }
        }
    }

    Err(last_error.unwrap_or_else(|| StoreError::invalid_input("unexpected retry loop exit")))
}

/// Check if a database error is transient.
fn is_retryable_db_error(err: &DbErr) -> bool {
    match err {
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => true,
        DbErr::Exec(_) | DbErr::Query(_) => {
            let err_str = err.to_string().to_lowercase();
            // SQLite: database is locked, busy
            // PostgreSQL: connection refused, too many connections
            err_str.contains("locked")
                || err_str.contains("busy")
                || err_str.contains("timeout")
                || err_str.contains("connection")
                || err_str.contains("temporarily unavailable")
        }
        _ => false,
    }
}

// ─── SyncEntity wiring ───────────────────────────────────────────────────────

impl SyncEntity for entity::repository::Entity {
    type SourceId = i64;
    fn source_id_column() -> Self::Column {
        entity::repository::Column::Id
    }
}

impl SyncEntity for entity::commit::Entity {
    type SourceId = String;
    fn source_id_column() -> Self::Column {
        entity::commit::Column::Sha
    }
}

impl SyncEntity for entity::pull_request::Entity {
    type SourceId = i64;
    fn source_id_column() -> Self::Column {
        entity::pull_request::Column::Id
    }
}

impl TracksProcessing for entity::pull_request::Entity {
    fn processed_at_column() -> Self::Column {
        entity::pull_request::Column::ProcessedAt
    }
}

impl SyncEntity for entity::issue::Entity {
    type SourceId = i64;
    fn source_id_column() -> Self::Column {
        entity::issue::Column::Id
    }
}

impl TracksProcessing for entity::issue::Entity {
    fn processed_at_column() -> Self::Column {
        entity::issue::Column::ProcessedAt
    }
}

impl SyncEntity for entity::review::Entity {
    type SourceId = i64;
    fn source_id_column() -> Self::Column {
        entity::review::Column::Id
    }
}

impl SyncEntity for entity::comment::Entity {
    type SourceId = i64;
    fn source_id_column() -> Self::Column {
        entity::comment::Column::Id
    }
}

impl SyncEntity for entity::file_change::Entity {
    type SourceId = String;
    fn source_id_column() -> Self::Column {
        entity::file_change::Column::Id
    }
}

impl SyncEntity for entity::project::Entity {
    type SourceId = i64;
    fn source_id_column() -> Self::Column {
        entity::project::Column::Id
    }
}

impl SyncEntity for entity::account::Entity {
    type SourceId = String;
    fn source_id_column() -> Self::Column {
        entity::account::Column::Id
    }
}

impl SyncEntity for entity::issue_link::Entity {
    type SourceId = i64;
    fn source_id_column() -> Self::Column {
        entity::issue_link::Column::Id
    }
}

impl SyncEntity for entity::attachment::Entity {
    type SourceId = i64;
    fn source_id_column() -> Self::Column {
        entity::attachment::Column::Id
    }
}

impl SyncEntity for entity::workspace::Entity {
    type SourceId = String;
    fn source_id_column() -> Self::Column {
        entity::workspace::Column::Id
    }
}

impl SyncEntity for entity::page::Entity {
    type SourceId = String;
    fn source_id_column() -> Self::Column {
        entity::page::Column::Id
    }
}

impl SyncEntity for entity::workspace_user::Entity {
    type SourceId = String;
    fn source_id_column() -> Self::Column {
        entity::workspace_user::Column::Id
    }
}
