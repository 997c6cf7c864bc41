use crate::error::ServerResult;
use crate::state::ServerState;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use userd::{User, UserPatch};

/// User as returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserResponse {
    /// Hex-encoded store identifier
    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id_hex(),
            name: user.name,
            email: user.email,
        }
    }
}

/// Body of create and update requests.
///
/// Unknown keys, including any client-supplied `id`/`_id`, are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct UserRequest {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub email: Option<String>,
}

impl From<UserRequest> for UserPatch {
    fn from(request: UserRequest) -> Self {
        UserPatch::new(request.name, request.email)
    }
}

/// List every user (GET /users)
pub async fn list_users(
    State(state): State<Arc<ServerState>>,
) -> ServerResult<Json<Vec<UserResponse>>> {
    let users = state.users.list().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Get a user by id (GET /users/{id})
pub async fn get_user(
    State(state): State<Arc<ServerState>>,
    path: Result<Path<String>, PathRejection>,
) -> ServerResult<Json<UserResponse>> {
    let Path(id) = path?;
    let user = state.users.get(&id).await?;
    Ok(Json(user.into()))
}

/// Create a user (POST /users)
pub async fn create_user(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<UserRequest>, JsonRejection>,
) -> ServerResult<impl IntoResponse> {
    let Json(request) = payload?;
    let user = state.users.create(request.into()).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Update name and/or email of an existing user (PUT /users/{id})
///
/// Responds with the user as it is after the update.
pub async fn update_user(
    State(state): State<Arc<ServerState>>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<UserRequest>, JsonRejection>,
) -> ServerResult<Json<UserResponse>> {
    let Path(id) = path?;
    let Json(request) = payload?;
    let user = state.users.update(&id, request.into()).await?;
    Ok(Json(user.into()))
}

/// Delete a user (DELETE /users/{id})
pub async fn delete_user(
    State(state): State<Arc<ServerState>>,
    path: Result<Path<String>, PathRejection>,
) -> ServerResult<StatusCode> {
    let Path(id) = path?;
    state.users.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use userd::ObjectId;

    #[test]
    fn response_omits_absent_fields() {
        let user = User {
            id: ObjectId::new(),
            name: Some("Ada".into()),
            email: None,
        };
        let hex = user.id_hex();
        let value = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert_eq!(value["id"], hex.as_str());
        assert_eq!(value["name"], "Ada");
        assert!(value.get("email").is_none());
    }

    #[test]
    fn request_ignores_client_ids() {
        let request: UserRequest =
            serde_json::from_str(r#"{"_id": "abc", "id": "def", "email": "a@x.com"}"#).unwrap();
        let patch = UserPatch::from(request);
        assert!(patch.name.is_none());
        assert_eq!(patch.email.as_deref(), Some("a@x.com"));
    }
}
