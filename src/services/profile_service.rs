use crate::database::MongoDB;
use crate::models::{Goal, User};
use crate::utils::AppError;
use mongodb::bson::{doc, to_bson, Bson, DateTime as BsonDateTime, Document};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};

/// Partial profile update. Only the fields declared here are updatable; a
/// `password` key in the request body is dropped by construction.
///
/// Each patch field is tri-state: absent leaves the stored value untouched,
/// an explicit `null` overwrites it to null, and a value replaces it. The
/// double-`Option` plus `deserialize_with` encodes that distinction.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncRequest {
    pub email: Option<String>,
    #[serde(deserialize_with = "patch_field")]
    #[schema(value_type = Option<String>)]
    pub name: Option<Option<String>>,
    #[serde(deserialize_with = "patch_field")]
    #[schema(value_type = Option<String>)]
    pub country: Option<Option<String>>,
    #[serde(deserialize_with = "patch_field")]
    #[schema(value_type = Option<Goal>)]
    pub goal: Option<Option<Goal>>,
    #[serde(deserialize_with = "patch_field")]
    #[schema(value_type = Option<Vec<Goal>>)]
    pub all_goals: Option<Option<Vec<Goal>>>,
}

fn patch_field<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

fn put_patch<T: Serialize>(
    set: &mut Document,
    key: &str,
    field: &Option<Option<T>>,
) -> Result<(), AppError> {
    if let Some(value) = field {
        let bson = match value {
            Some(v) => to_bson(v)
                .map_err(|e| AppError::InternalError(format!("Invalid {} value: {}", key, e)))?,
            None => Bson::Null,
        };
        set.insert(key, bson);
    }
    Ok(())
}

/// `$set` document for the patch. Each present top-level key replaces the
/// stored field wholesale - `goal` and `allGoals` are never deep-merged.
fn build_update(request: &SyncRequest) -> Result<Document, AppError> {
    let mut set = doc! { "updatedAt": BsonDateTime::now() };

    put_patch(&mut set, "name", &request.name)?;
    put_patch(&mut set, "country", &request.country)?;
    put_patch(&mut set, "goal", &request.goal)?;
    put_patch(&mut set, "allGoals", &request.all_goals)?;

    Ok(doc! { "$set": set })
}

pub async fn sync_profile(db: &MongoDB, request: &SyncRequest) -> Result<(), AppError> {
    let email = request
        .email
        .as_deref()
        .filter(|e| !e.is_empty())
        .ok_or_else(|| AppError::BadRequest("Email is required".to_string()))?;

    let update = build_update(request)?;

    let result = db
        .users()
        .update_one(doc! { "email": email }, update)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

    if result.matched_count == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    Ok(())
}

/// Stripped user document for the given email.
pub async fn get_user(db: &MongoDB, email: &str) -> Result<User, AppError> {
    let user = db
        .users()
        .find_one(doc! { "email": email })
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(user.stripped())
}

/// Field-presence/length summary of a user's goal data. Troubleshooting
/// surface only, not part of the stable contract.
pub fn goal_summary(user: &User) -> Value {
    let goal = user.goal.as_ref();
    json!({
        "email": user.email,
        "hasGoal": goal.is_some(),
        "goalTitle": goal.and_then(|g| g.title.clone()),
        "savedCurriculum": goal.map_or(0, |g| g.saved_curriculum.len()),
        "savedCourses": goal.map_or(0, |g| g.saved_courses.len()),
        "savedFeed": goal.map_or(0, |g| g.saved_feed.len()),
        "savedProducts": goal.map_or(0, |g| g.saved_products.len()),
        "savedVideos": goal.map_or(0, |g| g.saved_videos.len()),
        "allGoals": user.all_goals.len(),
    })
}

pub async fn debug_user(db: &MongoDB, email: &str) -> Result<Value, AppError> {
    let user = db
        .users()
        .find_one(doc! { "email": email })
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(goal_summary(&user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth_service::{self, AuthRequest};
    use uuid::Uuid;

    async fn test_db() -> MongoDB {
        dotenv::dotenv().ok();
        let uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017/LearningAppTest".to_string());
        MongoDB::new(&uri).await.expect("MongoDB must be running")
    }

    async fn register(db: &MongoDB, email: &str) {
        let request = AuthRequest {
            email: Some(email.to_string()),
            password: Some("s3cret".to_string()),
            name: Some("Test User".to_string()),
            country: Some("BR".to_string()),
            is_register: true,
        };
        auth_service::authenticate(db, &request).await.unwrap();
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_sync_unknown_email_not_found_no_write() {
        let db = test_db().await;
        let email = format!("ghost-{}@example.com", Uuid::new_v4());

        let request: SyncRequest = serde_json::from_value(json!({
            "email": email,
            "name": "Nobody"
        }))
        .unwrap();

        let result = sync_profile(&db, &request).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));

        // No document was created by the failed sync
        let stored = db
            .users()
            .find_one(doc! { "email": &email })
            .await
            .unwrap();
        assert!(stored.is_none());
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_register_then_get_round_trip() {
        let db = test_db().await;
        let email = format!("roundtrip-{}@example.com", Uuid::new_v4());

        register(&db, &email).await;

        let user = get_user(&db, &email).await.unwrap();
        assert_eq!(user.email, email);
        assert_eq!(user.name.as_deref(), Some("Test User"));
        assert_eq!(user.country.as_deref(), Some("BR"));

        // Retrieval never exposes the credential hash
        let body = serde_json::to_value(&user).unwrap();
        assert!(body.get("password").is_none());

        db.users().delete_one(doc! { "email": &email }).await.unwrap();
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_sync_goal_patch_applied() {
        let db = test_db().await;
        let email = format!("goalpatch-{}@example.com", Uuid::new_v4());

        register(&db, &email).await;

        let request: SyncRequest = serde_json::from_value(json!({
            "email": email,
            "goal": { "title": "Learn Rust", "savedCourses": [{"id": "c1"}] }
        }))
        .unwrap();
        sync_profile(&db, &request).await.unwrap();

        let user = get_user(&db, &email).await.unwrap();
        let goal = user.goal.expect("goal was set by the sync");
        assert_eq!(goal.title.as_deref(), Some("Learn Rust"));
        assert_eq!(goal.saved_courses.len(), 1);

        db.users().delete_one(doc! { "email": &email }).await.unwrap();
    }

    #[test]
    fn test_absent_field_left_untouched() {
        let request: SyncRequest =
            serde_json::from_str(r#"{"email": "a@b.com", "name": "Alice"}"#).unwrap();
        let update = build_update(&request).unwrap();
        let set = update.get_document("$set").unwrap();

        assert_eq!(set.get_str("name").unwrap(), "Alice");
        assert!(!set.contains_key("country"));
        assert!(!set.contains_key("goal"));
        assert!(set.contains_key("updatedAt"));
    }

    #[test]
    fn test_explicit_null_overwrites() {
        let request: SyncRequest =
            serde_json::from_str(r#"{"email": "a@b.com", "country": null}"#).unwrap();
        let update = build_update(&request).unwrap();
        let set = update.get_document("$set").unwrap();

        assert_eq!(set.get("country"), Some(&Bson::Null));
        assert!(!set.contains_key("name"));
    }

    #[test]
    fn test_goal_replaced_wholesale() {
        // A patch carrying only a title must still replace the whole goal:
        // prior saved arrays are lost unless the client resends them.
        let request: SyncRequest =
            serde_json::from_str(r#"{"email": "a@b.com", "goal": {"title": "X"}}"#).unwrap();
        let update = build_update(&request).unwrap();
        let set = update.get_document("$set").unwrap();

        let goal = set.get_document("goal").unwrap();
        assert_eq!(goal.get_str("title").unwrap(), "X");
        assert_eq!(goal.get_array("savedCourses").unwrap().len(), 0);
    }

    #[test]
    fn test_password_key_ignored() {
        let request: SyncRequest = serde_json::from_str(
            r#"{"email": "a@b.com", "password": "sneaky", "name": "Alice"}"#,
        )
        .unwrap();
        let update = build_update(&request).unwrap();
        let set = update.get_document("$set").unwrap();

        assert!(!set.contains_key("password"));
        assert_eq!(set.get_str("name").unwrap(), "Alice");
    }

    #[test]
    fn test_all_goals_patch() {
        let request: SyncRequest = serde_json::from_str(
            r#"{"email": "a@b.com", "allGoals": [{"title": "old"}, {"title": "older"}]}"#,
        )
        .unwrap();
        let update = build_update(&request).unwrap();
        let set = update.get_document("$set").unwrap();

        assert_eq!(set.get_array("allGoals").unwrap().len(), 2);
    }

    #[test]
    fn test_missing_email_rejected() {
        let request: SyncRequest = serde_json::from_str(r#"{"name": "Alice"}"#).unwrap();
        assert!(request.email.is_none());
    }

    #[test]
    fn test_goal_summary_counts() {
        let user = User {
            id: None,
            email: "a@b.com".to_string(),
            password: None,
            name: None,
            country: None,
            goal: Some(Goal {
                title: Some("Learn Rust".to_string()),
                saved_courses: vec![json!({"id": 1}), json!({"id": 2})],
                ..Goal::default()
            }),
            all_goals: vec![Goal::default()],
            created_at: None,
            updated_at: None,
        };

        let summary = goal_summary(&user);
        assert_eq!(summary["hasGoal"], true);
        assert_eq!(summary["goalTitle"], "Learn Rust");
        assert_eq!(summary["savedCourses"], 2);
        assert_eq!(summary["savedFeed"], 0);
        assert_eq!(summary["allGoals"], 1);
    }

    #[test]
    fn test_goal_summary_without_goal() {
        let user = User {
            id: None,
            email: "a@b.com".to_string(),
            password: None,
            name: None,
            country: None,
            goal: None,
            all_goals: vec![],
            created_at: None,
            updated_at: None,
        };

        let summary = goal_summary(&user);
        assert_eq!(summary["hasGoal"], false);
        assert_eq!(summary["goalTitle"], Value::Null);
        assert_eq!(summary["savedCurriculum"], 0);
    }
}
