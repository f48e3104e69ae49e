//! Account database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::{Account, Profile};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub name: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub profile: Json,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for Account {
    fn from(model: Model) -> Self {
        Account {
            id: model.id,
            email: model.email,
            password_hash: model.password_hash,
            name: model.name,
            profile: profile_from_json(model.profile),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Non-object JSON (only reachable through manual edits) reads as empty.
pub(crate) fn profile_from_json(value: Json) -> Profile {
    match value {
        Json::Object(map) => map,
        _ => Profile::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn test_model_into_account() {
        let now = Utc::now();
        let id = Uuid::new_v4();
        let model = Model {
            id,
            email: "row@example.com".to_string(),
            password_hash: "$argon2id$row".to_string(),
            name: "Row".to_string(),
            profile: json!({ "desk": "3F" }),
            created_at: now,
            updated_at: now,
        };

        let account = Account::from(model);
        assert_eq!(account.id, id);
        assert_eq!(account.password_hash, "$argon2id$row");
        assert_eq!(account.profile["desk"], "3F");
    }

    #[test]
    fn test_non_object_profile_is_empty() {
        assert!(profile_from_json(json!(null)).is_empty());
        assert!(profile_from_json(json!([1, 2])).is_empty());
    }
}
