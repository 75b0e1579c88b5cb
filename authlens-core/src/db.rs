use std::path::Path;

use authlens_common::{AuthlensError, LoginEvent, UserAccount};
use authlens_db_entities::{LoginEvent as LoginEventRow, User};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, DbErr,
    EntityTrait, FromQueryResult, QueryFilter, QueryOrder, Statement,
};

const SQLITE_MODE_READ_ONLY: &str = "ro";
const SQLITE_MODE_READ_WRITE: &str = "rw";

/// Opens the snapshot for reading only. The handle must stay scoped to a
/// single logical operation and is never upgraded for writes.
pub async fn open_read_only(path: &Path) -> Result<DatabaseConnection, AuthlensError> {
    open(path, SQLITE_MODE_READ_ONLY).await
}

/// Opens a separate write-capable handle against an existing snapshot
/// (`mode=rw`, never `rwc` - the file has to be there already).
pub async fn open_writable(path: &Path) -> Result<DatabaseConnection, AuthlensError> {
    open(path, SQLITE_MODE_READ_WRITE).await
}

async fn open(path: &Path, mode: &str) -> Result<DatabaseConnection, AuthlensError> {
    let unavailable = |detail: String| AuthlensError::SourceUnavailable {
        path: path.display().to_string(),
        detail,
    };

    let abs_path = std::fs::canonicalize(path).map_err(|e| unavailable(e.to_string()))?;

    let mut db_url = url::Url::parse("sqlite://")?;
    db_url.set_path(
        abs_path
            .to_str()
            .ok_or_else(|| unavailable("path is not valid UTF-8".to_owned()))?,
    );
    db_url.set_query(Some(&format!("mode={mode}")));

    let mut opt = ConnectOptions::new(db_url.to_string());
    opt.max_connections(1).sqlx_logging(false);

    Database::connect(opt)
        .await
        .map_err(|e| unavailable(e.to_string()))
}

/// Loads all accounts ordered by username ascending. A row that fails to
/// convert aborts the whole load; partial snapshots are never adopted.
pub async fn load_users(db: &DatabaseConnection) -> Result<Vec<UserAccount>, AuthlensError> {
    let rows = User::Entity::find()
        .order_by_asc(User::Column::Username)
        .all(db)
        .await?;
    rows.into_iter().map(UserAccount::try_from).collect()
}

/// Loads all login events, newest first. A snapshot without the
/// `login_events` table fails with [`AuthlensError::LegacySchemaGap`] so
/// that callers can tell the absent-table case apart from a genuine
/// failure; only the former may be absorbed.
pub async fn load_login_events(db: &DatabaseConnection) -> Result<Vec<LoginEvent>, AuthlensError> {
    let stmt = Statement::from_string(DbBackend::Sqlite, LoginEventRow::SELECT_ALL.to_owned());
    let rows = match db.query_all(stmt).await {
        Ok(rows) => rows,
        Err(err) if is_missing_table(&err) => return Err(AuthlensError::LegacySchemaGap),
        Err(err) => return Err(err.into()),
    };

    let mut events = Vec::with_capacity(rows.len());
    for row in rows {
        let model = LoginEventRow::Model::from_query_result(&row, "")?;
        events.push(LoginEvent::try_from(model)?);
    }
    Ok(events)
}

/// Sets the lock flag on exactly the row identified by `id` and reports
/// how many rows the UPDATE touched.
pub async fn update_user_lock_state(
    db: &DatabaseConnection,
    id: i64,
    locked: bool,
) -> Result<u64, AuthlensError> {
    let result = User::Entity::update_many()
        .col_expr(User::Column::Locked, Expr::value(locked))
        .filter(User::Column::Id.eq(id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

fn is_missing_table(err: &DbErr) -> bool {
    err.to_string().to_lowercase().contains("no such table")
}
