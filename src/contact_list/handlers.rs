use super::error::ContactListError;
use super::service::ContactListService;
use super::types::*;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use log::debug;
use std::sync::Arc;

use crate::shared::state::AppState;

pub const OWNER_UPDATED: &str = "User already exists details updated.";
pub const OWNER_DELETED: &str = "User deleted";
pub const CONTACT_UPDATED: &str = "Contact updated.";
pub const CONTACT_DELETED: &str = "Contact deleted";

pub fn contact_list_routes() -> Router<Arc<AppState>> {
    // Both filter routes share the `:target` name; the router rejects two
    // differently named parameters at the same position.
    Router::new()
        .route("/", get(list_owners_handler).post(upsert_owner_handler))
        .route("/:id", get(get_owner_handler).delete(delete_owner_handler))
        .route("/filter/:target", get(filter_owners_handler))
        .route("/filter/:target/:contact_type", get(filter_owner_handler))
        .route(
            "/contact/:id",
            post(upsert_contact_handler).delete(delete_contact_handler),
        )
}

fn service(state: &AppState) -> ContactListService {
    ContactListService::new(Arc::clone(&state.store))
}

/// A body sent without a JSON content type is read as an empty object, so the
/// caller gets the usual field errors.
fn body<T: Default>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ContactListError> {
    match payload {
        Ok(Json(request)) => Ok(request),
        Err(JsonRejection::MissingJsonContentType(_)) => {
            debug!("Request body has no JSON content type, treating it as empty");
            Ok(T::default())
        }
        Err(rejection) => {
            debug!("Rejected request body: {rejection}");
            Err(ContactListError::MalformedBody(rejection.body_text()))
        }
    }
}

pub async fn upsert_owner_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<OwnerRequest>, JsonRejection>,
) -> Result<Response, ContactListError> {
    let request = body(payload)?;
    match service(&state).upsert_owner(request).await? {
        OwnerUpsert::Created(owner) => Ok(Json(owner).into_response()),
        // Existing clients rely on the 400 status for an update.
        OwnerUpsert::Updated(_) => Ok((StatusCode::BAD_REQUEST, OWNER_UPDATED).into_response()),
    }
}

pub async fn list_owners_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<OwnerWithContacts>>, ContactListError> {
    let owners = service(&state).list_owners(&TypeFilter::Any).await?;
    Ok(Json(owners))
}

pub async fn get_owner_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<OwnerWithContacts>, ContactListError> {
    let owner = service(&state).get_owner(&id, &TypeFilter::Any).await?;
    Ok(Json(owner))
}

pub async fn filter_owners_handler(
    State(state): State<Arc<AppState>>,
    Path(contact_type): Path<String>,
) -> Result<Json<Vec<OwnerWithContacts>>, ContactListError> {
    let filter = TypeFilter::parse(&contact_type);
    let owners = service(&state).list_owners(&filter).await?;
    Ok(Json(owners))
}

pub async fn filter_owner_handler(
    State(state): State<Arc<AppState>>,
    Path((id, contact_type)): Path<(String, String)>,
) -> Result<Json<OwnerWithContacts>, ContactListError> {
    let filter = TypeFilter::parse(&contact_type);
    let owner = service(&state).get_owner(&id, &filter).await?;
    Ok(Json(owner))
}

pub async fn delete_owner_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ContactListError> {
    service(&state).delete_owner(&id).await?;
    Ok(Json(MessageResponse::new(OWNER_DELETED)))
}

pub async fn upsert_contact_handler(
    State(state): State<Arc<AppState>>,
    Path(owner_id): Path<String>,
    payload: Result<Json<ContactRequest>, JsonRejection>,
) -> Result<Response, ContactListError> {
    let request = body(payload)?;
    match service(&state).upsert_contact(&owner_id, request).await? {
        ContactUpsert::Created(contact) => Ok(Json(contact).into_response()),
        ContactUpsert::Updated(_) => Ok(Json(MessageResponse::new(CONTACT_UPDATED)).into_response()),
    }
}

pub async fn delete_contact_handler(
    State(state): State<Arc<AppState>>,
    Path(contact_id): Path<String>,
) -> Result<Json<MessageResponse>, ContactListError> {
    service(&state).delete_contact(&contact_id).await?;
    Ok(Json(MessageResponse::new(CONTACT_DELETED)))
}
