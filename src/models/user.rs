use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A learning goal and the content the user saved under it.
/// Saved entries are schema-flexible client documents, stored as-is.
#[derive(Debug, Serialize, Deserialize, Clone, Default, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Goal {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[schema(value_type = Vec<Object>)]
    pub saved_curriculum: Vec<Value>,
    #[schema(value_type = Vec<Object>)]
    pub saved_courses: Vec<Value>,
    #[schema(value_type = Vec<Object>)]
    pub saved_feed: Vec<Value>,
    #[schema(value_type = Vec<Object>)]
    pub saved_products: Vec<Value>,
    #[schema(value_type = Vec<Object>)]
    pub saved_videos: Vec<Value>,
}

// User model - one document per email in the `users` collection
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,  // PRIMARY IDENTIFIER - unique index
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,  // bcrypt hash, never leaves the service
    pub name: Option<String>,
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal: Option<Goal>,
    #[serde(default)]
    pub all_goals: Vec<Goal>,
    pub created_at: Option<BsonDateTime>,
    pub updated_at: Option<BsonDateTime>,
}

impl User {
    /// Copy of the record safe to return to clients: the password hash is
    /// dropped, so `skip_serializing_if` keeps it out of the JSON entirely.
    pub fn stripped(&self) -> User {
        User {
            password: None,
            ..self.clone()
        }
    }
}
