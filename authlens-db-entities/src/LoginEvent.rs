use authlens_common::AuthlensError;
use chrono::{DateTime, NaiveDateTime, Utc};
use sea_orm::FromQueryResult;

/// Row shape of the `login_events` table. The snapshot schema gives this
/// table no primary key, so it is read with a raw ordered SELECT instead
/// of an entity.
#[derive(Clone, Debug, PartialEq, Eq, FromQueryResult)]
pub struct Model {
    pub username: String,
    pub success: bool,
    pub mode: String,
    pub reason: Option<String>,
    pub occurred_at: String,
}

pub const SELECT_ALL: &str = "SELECT username, success, mode, reason, occurred_at \
     FROM login_events ORDER BY occurred_at DESC";

impl TryFrom<Model> for authlens_common::LoginEvent {
    type Error = AuthlensError;

    fn try_from(model: Model) -> Result<Self, AuthlensError> {
        let occurred_at =
            parse_timestamp(&model.occurred_at).ok_or_else(|| AuthlensError::MalformedRow {
                table: "login_events",
                detail: format!("unparseable occurred_at {:?}", model.occurred_at),
            })?;
        Ok(authlens_common::LoginEvent {
            username: model.username,
            success: model.success,
            mode: model.mode,
            reason: model.reason.unwrap_or_default(),
            occurred_at,
            high_risk: false,
        })
    }
}

/// Snapshots store timestamps as text, either RFC 3339 or the plain
/// `YYYY-MM-DD HH:MM:SS` sqlite shape (read as UTC).
fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}
