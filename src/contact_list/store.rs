use async_trait::async_trait;
use uuid::Uuid;

use super::error::StoreError;
use super::types::{Contact, ContactPatch, NewContact, NewOwner, Owner, OwnerPatch, TypeFilter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence for owners and their contacts.
///
/// Lookups return `Ok(None)` for absent records; `Err` is reserved for
/// failures of the backend itself.
#[async_trait]
pub trait ContactListStore: Send + Sync {
    async fn list_owners(&self) -> StoreResult<Vec<Owner>>;
    async fn find_owner(&self, id: Uuid) -> StoreResult<Option<Owner>>;
    async fn find_owner_by_email(&self, email: &str) -> StoreResult<Option<Owner>>;
    async fn insert_owner(&self, owner: NewOwner) -> StoreResult<Owner>;
    async fn update_owner_by_email(
        &self,
        email: &str,
        patch: OwnerPatch,
    ) -> StoreResult<Option<Owner>>;

    /// Removes the owner together with every contact that references it.
    async fn delete_owner_cascade(&self, id: Uuid) -> StoreResult<Option<Owner>>;

    async fn find_contacts(&self, owner_id: Uuid, filter: &TypeFilter)
        -> StoreResult<Vec<Contact>>;
    async fn find_contact_by_email(
        &self,
        owner_id: Uuid,
        email: &str,
    ) -> StoreResult<Option<Contact>>;
    async fn insert_contact(&self, contact: NewContact) -> StoreResult<Contact>;
    async fn update_contact_by_email(
        &self,
        owner_id: Uuid,
        email: &str,
        patch: ContactPatch,
    ) -> StoreResult<Option<Contact>>;
    async fn delete_contact(&self, id: Uuid) -> StoreResult<Option<Contact>>;

    /// Cheap reachability probe for health checks.
    async fn ping(&self) -> bool;
}
