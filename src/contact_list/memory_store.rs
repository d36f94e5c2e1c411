use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use super::error::StoreError;
use super::store::{ContactListStore, StoreResult};
use super::types::{Contact, ContactPatch, NewContact, NewOwner, Owner, OwnerPatch, TypeFilter};

#[derive(Default)]
struct Tables {
    owners: Vec<Owner>,
    contacts: Vec<Contact>,
}

/// In-process store. Records keep insertion order; every operation takes the
/// lock once, so the owner cascade cannot be observed half-done.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Tables>> {
        self.tables.lock().map_err(|_| StoreError::Poisoned)
    }
}

#[async_trait]
impl ContactListStore for MemoryStore {
    async fn list_owners(&self) -> StoreResult<Vec<Owner>> {
        Ok(self.lock()?.owners.clone())
    }

    async fn find_owner(&self, id: Uuid) -> StoreResult<Option<Owner>> {
        Ok(self.lock()?.owners.iter().find(|o| o.id == id).cloned())
    }

    async fn find_owner_by_email(&self, email: &str) -> StoreResult<Option<Owner>> {
        Ok(self
            .lock()?
            .owners
            .iter()
            .find(|o| o.email == email)
            .cloned())
    }

    async fn insert_owner(&self, owner: NewOwner) -> StoreResult<Owner> {
        let mut tables = self.lock()?;
        if tables.owners.iter().any(|o| o.email == owner.email) {
            return Err(StoreError::DuplicateEmail(owner.email));
        }
        let owner = Owner {
            id: Uuid::new_v4(),
            name: owner.name,
            email: owner.email,
            phone_number: owner.phone_number,
            created_at: Utc::now(),
        };
        tables.owners.push(owner.clone());
        Ok(owner)
    }

    async fn update_owner_by_email(
        &self,
        email: &str,
        patch: OwnerPatch,
    ) -> StoreResult<Option<Owner>> {
        let mut tables = self.lock()?;
        let updated = tables
            .owners
            .iter_mut()
            .find(|o| o.email == email)
            .map(|owner| {
                patch.apply(owner);
                owner.clone()
            });
        Ok(updated)
    }

    async fn delete_owner_cascade(&self, id: Uuid) -> StoreResult<Option<Owner>> {
        let mut tables = self.lock()?;
        tables.contacts.retain(|c| c.owner_id != id);
        let position = tables.owners.iter().position(|o| o.id == id);
        Ok(position.map(|index| tables.owners.remove(index)))
    }

    async fn find_contacts(
        &self,
        owner_id: Uuid,
        filter: &TypeFilter,
    ) -> StoreResult<Vec<Contact>> {
        Ok(self
            .lock()?
            .contacts
            .iter()
            .filter(|c| c.owner_id == owner_id && filter.matches(&c.contact_type))
            .cloned()
            .collect())
    }

    async fn find_contact_by_email(
        &self,
        owner_id: Uuid,
        email: &str,
    ) -> StoreResult<Option<Contact>> {
        Ok(self
            .lock()?
            .contacts
            .iter()
            .find(|c| c.owner_id == owner_id && c.contact_email == email)
            .cloned())
    }

    async fn insert_contact(&self, contact: NewContact) -> StoreResult<Contact> {
        let mut tables = self.lock()?;
        if tables
            .contacts
            .iter()
            .any(|c| c.owner_id == contact.owner_id && c.contact_email == contact.contact_email)
        {
            return Err(StoreError::DuplicateContact(contact.contact_email));
        }
        let contact = Contact {
            id: Uuid::new_v4(),
            owner_id: contact.owner_id,
            contact_name: contact.contact_name,
            contact_email: contact.contact_email,
            contact_phone: contact.contact_phone,
            contact_type: contact.contact_type,
            created_at: Utc::now(),
        };
        tables.contacts.push(contact.clone());
        Ok(contact)
    }

    async fn update_contact_by_email(
        &self,
        owner_id: Uuid,
        email: &str,
        patch: ContactPatch,
    ) -> StoreResult<Option<Contact>> {
        let mut tables = self.lock()?;
        let updated = tables
            .contacts
            .iter_mut()
            .find(|c| c.owner_id == owner_id && c.contact_email == email)
            .map(|contact| {
                patch.apply(contact);
                contact.clone()
            });
        Ok(updated)
    }

    async fn delete_contact(&self, id: Uuid) -> StoreResult<Option<Contact>> {
        let mut tables = self.lock()?;
        let position = tables.contacts.iter().position(|c| c.id == id);
        Ok(position.map(|index| tables.contacts.remove(index)))
    }

    async fn ping(&self) -> bool {
        self.lock().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_owner(email: &str) -> NewOwner {
        NewOwner {
            name: "Jane".to_string(),
            email: email.to_string(),
            phone_number: "5551234567".to_string(),
        }
    }

    fn new_contact(owner_id: Uuid, email: &str, contact_type: &str) -> NewContact {
        NewContact {
            owner_id,
            contact_name: "Bob".to_string(),
            contact_email: email.to_string(),
            contact_phone: "5559876543".to_string(),
            contact_type: contact_type.to_string(),
        }
    }

    #[tokio::test]
    async fn test_owner_email_is_unique() {
        let store = MemoryStore::new();
        store.insert_owner(new_owner("jane@example.com")).await.unwrap();
        let err = store
            .insert_owner(new_owner("jane@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail(_)));
        assert_eq!(store.list_owners().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_patch_keeps_unset_fields() {
        let store = MemoryStore::new();
        let owner = store.insert_owner(new_owner("jane@example.com")).await.unwrap();
        let patch = OwnerPatch {
            name: Some("Janet".to_string()),
            phone_number: None,
        };
        let updated = store
            .update_owner_by_email("jane@example.com", patch)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.id, owner.id);
        assert_eq!(updated.name, "Janet");
        assert_eq!(updated.phone_number, owner.phone_number);
    }

    #[tokio::test]
    async fn test_cascade_only_touches_owner_contacts() {
        let store = MemoryStore::new();
        let jane = store.insert_owner(new_owner("jane@example.com")).await.unwrap();
        let john = store.insert_owner(new_owner("john@example.com")).await.unwrap();
        store
            .insert_contact(new_contact(jane.id, "a@example.com", "Personal"))
            .await
            .unwrap();
        store
            .insert_contact(new_contact(john.id, "b@example.com", "Business"))
            .await
            .unwrap();

        let removed = store.delete_owner_cascade(jane.id).await.unwrap();
        assert_eq!(removed.map(|o| o.id), Some(jane.id));
        assert!(store
            .find_contacts(jane.id, &TypeFilter::Any)
            .await
            .unwrap()
            .is_empty());
        assert_eq!(
            store.find_contacts(john.id, &TypeFilter::Any).await.unwrap().len(),
            1
        );
        assert!(store.delete_owner_cascade(jane.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_type_filter_is_exact() {
        let store = MemoryStore::new();
        let jane = store.insert_owner(new_owner("jane@example.com")).await.unwrap();
        store
            .insert_contact(new_contact(jane.id, "a@example.com", "Personal"))
            .await
            .unwrap();
        store
            .insert_contact(new_contact(jane.id, "b@example.com", "personal"))
            .await
            .unwrap();

        let exact = TypeFilter::parse("Personal");
        let found = store.find_contacts(jane.id, &exact).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].contact_email, "a@example.com");
    }
}
