use log::{info, warn};
use std::sync::Arc;
use uuid::Uuid;

use super::error::{ContactListError, StoreError};
use super::store::ContactListStore;
use super::types::*;
use super::validation::{validate_contact, validate_owner};

/// Owner and contact operations on top of an injected store handle.
#[derive(Clone)]
pub struct ContactListService {
    store: Arc<dyn ContactListStore>,
}

/// Path ids that do not parse as a UUID are reported as missing records.
pub fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}

impl ContactListService {
    pub fn new(store: Arc<dyn ContactListStore>) -> Self {
        Self { store }
    }

    pub async fn upsert_owner(
        &self,
        request: OwnerRequest,
    ) -> Result<OwnerUpsert, ContactListError> {
        validate_owner(&request).map_err(ContactListError::Validation)?;

        let patch = OwnerPatch::from_request(&request);
        let (Some(name), Some(email), Some(phone_number)) =
            (request.name, request.email, request.phone_number)
        else {
            return Err(ContactListError::MalformedBody(
                "name, email and phoneNumber are required".to_string(),
            ));
        };

        if self.store.find_owner_by_email(&email).await?.is_some() {
            return self.update_owner(&email, patch).await;
        }

        let new_owner = NewOwner {
            name,
            email: email.clone(),
            phone_number,
        };
        match self.store.insert_owner(new_owner).await {
            Ok(owner) => {
                info!("Created owner {} <{}>", owner.id, owner.email);
                Ok(OwnerUpsert::Created(owner))
            }
            Err(StoreError::DuplicateEmail(_)) => {
                warn!("Owner <{email}> was created concurrently, updating instead");
                self.update_owner(&email, patch).await
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn update_owner(
        &self,
        email: &str,
        patch: OwnerPatch,
    ) -> Result<OwnerUpsert, ContactListError> {
        let owner = self
            .store
            .update_owner_by_email(email, patch)
            .await?
            .ok_or(ContactListError::OwnerNotFound)?;
        info!("Updated owner {} <{}>", owner.id, owner.email);
        Ok(OwnerUpsert::Updated(owner))
    }

    pub async fn list_owners(
        &self,
        filter: &TypeFilter,
    ) -> Result<Vec<OwnerWithContacts>, ContactListError> {
        let owners = self.store.list_owners().await?;
        let mut result = Vec::with_capacity(owners.len());
        for owner in owners {
            result.push(self.with_contacts(owner, filter).await?);
        }
        Ok(result)
    }

    pub async fn get_owner(
        &self,
        raw_id: &str,
        filter: &TypeFilter,
    ) -> Result<OwnerWithContacts, ContactListError> {
        let owner = self.require_owner(raw_id).await?;
        self.with_contacts(owner, filter).await
    }

    pub async fn delete_owner(&self, raw_id: &str) -> Result<Owner, ContactListError> {
        let id = parse_id(raw_id).ok_or(ContactListError::OwnerNotFound)?;
        let owner = self
            .store
            .delete_owner_cascade(id)
            .await?
            .ok_or(ContactListError::OwnerNotFound)?;
        info!("Deleted owner {} and its contacts", owner.id);
        Ok(owner)
    }

    pub async fn upsert_contact(
        &self,
        raw_owner_id: &str,
        request: ContactRequest,
    ) -> Result<ContactUpsert, ContactListError> {
        validate_contact(&request).map_err(ContactListError::Validation)?;
        let owner = self.require_owner(raw_owner_id).await?;

        let patch = ContactPatch::from_request(&request);
        let (Some(contact_name), Some(contact_email), Some(contact_phone), Some(contact_type)) = (
            request.contact_name,
            request.contact_email,
            request.contact_phone,
            request.contact_type,
        ) else {
            return Err(ContactListError::MalformedBody(
                "contactName, contactEmail, contactPhone and contactType are required"
                    .to_string(),
            ));
        };

        if self
            .store
            .find_contact_by_email(owner.id, &contact_email)
            .await?
            .is_some()
        {
            return self.update_contact(owner.id, &contact_email, patch).await;
        }

        let new_contact = NewContact {
            owner_id: owner.id,
            contact_name,
            contact_email: contact_email.clone(),
            contact_phone,
            contact_type,
        };
        match self.store.insert_contact(new_contact).await {
            Ok(contact) => {
                info!("Created contact {} for owner {}", contact.id, owner.id);
                Ok(ContactUpsert::Created(contact))
            }
            Err(StoreError::DuplicateContact(_)) => {
                warn!("Contact <{contact_email}> was created concurrently, updating instead");
                self.update_contact(owner.id, &contact_email, patch).await
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn update_contact(
        &self,
        owner_id: Uuid,
        email: &str,
        patch: ContactPatch,
    ) -> Result<ContactUpsert, ContactListError> {
        let contact = self
            .store
            .update_contact_by_email(owner_id, email, patch)
            .await?
            .ok_or(ContactListError::ContactNotFound)?;
        info!("Updated contact {} for owner {owner_id}", contact.id);
        Ok(ContactUpsert::Updated(contact))
    }

    pub async fn delete_contact(&self, raw_id: &str) -> Result<Contact, ContactListError> {
        let id = parse_id(raw_id).ok_or(ContactListError::ContactNotFound)?;
        let contact = self
            .store
            .delete_contact(id)
            .await?
            .ok_or(ContactListError::ContactNotFound)?;
        info!("Deleted contact {}", contact.id);
        Ok(contact)
    }

    async fn require_owner(&self, raw_id: &str) -> Result<Owner, ContactListError> {
        let id = parse_id(raw_id).ok_or(ContactListError::OwnerNotFound)?;
        self.store
            .find_owner(id)
            .await?
            .ok_or(ContactListError::OwnerNotFound)
    }

    async fn with_contacts(
        &self,
        owner: Owner,
        filter: &TypeFilter,
    ) -> Result<OwnerWithContacts, ContactListError> {
        let contacts = self.store.find_contacts(owner.id, filter).await?;
        Ok(OwnerWithContacts { owner, contacts })
    }
}
