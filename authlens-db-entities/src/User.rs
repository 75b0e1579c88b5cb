use authlens_common::{AuthlensError, UserAccount};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub username: String,
    pub failed_attempts: i64,
    pub locked: bool,
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for UserAccount {
    type Error = AuthlensError;

    fn try_from(model: Model) -> Result<Self, AuthlensError> {
        if model.failed_attempts < 0 {
            return Err(AuthlensError::MalformedRow {
                table: "users",
                detail: format!("negative failed_attempts for user {}", model.id),
            });
        }
        Ok(UserAccount {
            id: model.id,
            username: model.username,
            failed_attempts: model.failed_attempts,
            locked: model.locked,
            created_at: model.created_at,
            high_risk: false,
        })
    }
}
