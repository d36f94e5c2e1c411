use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use log::{debug, error};
use uuid::Uuid;

use super::error::StoreError;
use super::store::{ContactListStore, StoreResult};
use super::types::{Contact, ContactPatch, NewContact, NewOwner, Owner, OwnerPatch, TypeFilter};
use crate::shared::schema::{contacts, owners};
use crate::shared::utils::DbPool;

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = owners)]
#[diesel(check_for_backend(diesel::pg::Pg))]
struct DbOwner {
    id: Uuid,
    name: String,
    email: String,
    phone_number: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = contacts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
struct DbContact {
    id: Uuid,
    owner_id: Uuid,
    contact_name: String,
    contact_email: String,
    contact_phone: String,
    contact_type: String,
    created_at: DateTime<Utc>,
}

#[derive(AsChangeset)]
#[diesel(table_name = owners)]
struct OwnerChanges {
    name: Option<String>,
    phone_number: Option<String>,
}

#[derive(AsChangeset)]
#[diesel(table_name = contacts)]
struct ContactChanges {
    contact_name: Option<String>,
    contact_phone: Option<String>,
    contact_type: Option<String>,
}

impl From<DbOwner> for Owner {
    fn from(db: DbOwner) -> Self {
        Self {
            id: db.id,
            name: db.name,
            email: db.email,
            phone_number: db.phone_number,
            created_at: db.created_at,
        }
    }
}

impl From<DbContact> for Contact {
    fn from(db: DbContact) -> Self {
        Self {
            id: db.id,
            owner_id: db.owner_id,
            contact_name: db.contact_name,
            contact_email: db.contact_email,
            contact_phone: db.contact_phone,
            contact_type: db.contact_type,
            created_at: db.created_at,
        }
    }
}

fn is_unique_violation(err: &DieselError) -> bool {
    matches!(
        err,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    )
}

/// PostgreSQL-backed store. Diesel is synchronous, so every call checks a
/// connection out of the pool on the blocking thread pool.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn run<T, F>(&self, op: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> StoreResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(|e| {
                error!("Failed to get database connection: {e}");
                StoreError::from(e)
            })?;
            op(&mut conn)
        })
        .await?
    }
}

#[async_trait]
impl ContactListStore for PgStore {
    async fn list_owners(&self) -> StoreResult<Vec<Owner>> {
        self.run(|conn| {
            let rows: Vec<DbOwner> = owners::table
                .order((owners::created_at.asc(), owners::id.asc()))
                .select(DbOwner::as_select())
                .load(conn)?;
            Ok(rows.into_iter().map(Owner::from).collect())
        })
        .await
    }

    async fn find_owner(&self, id: Uuid) -> StoreResult<Option<Owner>> {
        self.run(move |conn| {
            let row = owners::table
                .find(id)
                .select(DbOwner::as_select())
                .first(conn)
                .optional()?;
            Ok(row.map(Owner::from))
        })
        .await
    }

    async fn find_owner_by_email(&self, email: &str) -> StoreResult<Option<Owner>> {
        let email = email.to_string();
        self.run(move |conn| {
            let row = owners::table
                .filter(owners::email.eq(email.as_str()))
                .select(DbOwner::as_select())
                .first(conn)
                .optional()?;
            Ok(row.map(Owner::from))
        })
        .await
    }

    async fn insert_owner(&self, owner: NewOwner) -> StoreResult<Owner> {
        self.run(move |conn| {
            let row = DbOwner {
                id: Uuid::new_v4(),
                name: owner.name,
                email: owner.email,
                phone_number: owner.phone_number,
                created_at: Utc::now(),
            };
            diesel::insert_into(owners::table)
                .values(&row)
                .returning(DbOwner::as_returning())
                .get_result(conn)
                .map(Owner::from)
                .map_err(|e| {
                    if is_unique_violation(&e) {
                        StoreError::DuplicateEmail(row.email.clone())
                    } else {
                        e.into()
                    }
                })
        })
        .await
    }

    async fn update_owner_by_email(
        &self,
        email: &str,
        patch: OwnerPatch,
    ) -> StoreResult<Option<Owner>> {
        if patch.is_empty() {
            return self.find_owner_by_email(email).await;
        }
        let email = email.to_string();
        self.run(move |conn| {
            let changes = OwnerChanges {
                name: patch.name,
                phone_number: patch.phone_number,
            };
            let row = diesel::update(owners::table.filter(owners::email.eq(email.as_str())))
                .set(&changes)
                .returning(DbOwner::as_returning())
                .get_result(conn)
                .optional()?;
            Ok(row.map(Owner::from))
        })
        .await
    }

    async fn delete_owner_cascade(&self, id: Uuid) -> StoreResult<Option<Owner>> {
        self.run(move |conn| {
            let row = conn.transaction::<_, DieselError, _>(|conn| {
                let removed = diesel::delete(contacts::table.filter(contacts::owner_id.eq(id)))
                    .execute(conn)?;
                debug!("Removed {removed} contact(s) of owner {id}");
                diesel::delete(owners::table.find(id))
                    .returning(DbOwner::as_returning())
                    .get_result(conn)
                    .optional()
            })?;
            Ok(row.map(Owner::from))
        })
        .await
    }

    async fn find_contacts(
        &self,
        owner_id: Uuid,
        filter: &TypeFilter,
    ) -> StoreResult<Vec<Contact>> {
        let contact_type = filter.as_exact().map(str::to_string);
        self.run(move |conn| {
            let mut query = contacts::table
                .filter(contacts::owner_id.eq(owner_id))
                .into_boxed();
            if let Some(contact_type) = contact_type {
                query = query.filter(contacts::contact_type.eq(contact_type));
            }
            let rows: Vec<DbContact> = query
                .order((contacts::created_at.asc(), contacts::id.asc()))
                .select(DbContact::as_select())
                .load(conn)?;
            Ok(rows.into_iter().map(Contact::from).collect())
        })
        .await
    }

    async fn find_contact_by_email(
        &self,
        owner_id: Uuid,
        email: &str,
    ) -> StoreResult<Option<Contact>> {
        let email = email.to_string();
        self.run(move |conn| {
            let row = contacts::table
                .filter(contacts::owner_id.eq(owner_id))
                .filter(contacts::contact_email.eq(email.as_str()))
                .select(DbContact::as_select())
                .first(conn)
                .optional()?;
            Ok(row.map(Contact::from))
        })
        .await
    }

    async fn insert_contact(&self, contact: NewContact) -> StoreResult<Contact> {
        self.run(move |conn| {
            let row = DbContact {
                id: Uuid::new_v4(),
                owner_id: contact.owner_id,
                contact_name: contact.contact_name,
                contact_email: contact.contact_email,
                contact_phone: contact.contact_phone,
                contact_type: contact.contact_type,
                created_at: Utc::now(),
            };
            diesel::insert_into(contacts::table)
                .values(&row)
                .returning(DbContact::as_returning())
                .get_result(conn)
                .map(Contact::from)
                .map_err(|e| {
                    if is_unique_violation(&e) {
                        StoreError::DuplicateContact(row.contact_email.clone())
                    } else {
                        e.into()
                    }
                })
        })
        .await
    }

    async fn update_contact_by_email(
        &self,
        owner_id: Uuid,
        email: &str,
        patch: ContactPatch,
    ) -> StoreResult<Option<Contact>> {
        if patch.is_empty() {
            return self.find_contact_by_email(owner_id, email).await;
        }
        let email = email.to_string();
        self.run(move |conn| {
            let changes = ContactChanges {
                contact_name: patch.contact_name,
                contact_phone: patch.contact_phone,
                contact_type: patch.contact_type,
            };
            let row = diesel::update(
                contacts::table
                    .filter(contacts::owner_id.eq(owner_id))
                    .filter(contacts::contact_email.eq(email.as_str())),
            )
            .set(&changes)
            .returning(DbContact::as_returning())
            .get_result(conn)
            .optional()?;
            Ok(row.map(Contact::from))
        })
        .await
    }

    async fn delete_contact(&self, id: Uuid) -> StoreResult<Option<Contact>> {
        self.run(move |conn| {
            let row = diesel::delete(contacts::table.find(id))
                .returning(DbContact::as_returning())
                .get_result(conn)
                .optional()?;
            Ok(row.map(Contact::from))
        })
        .await
    }

    async fn ping(&self) -> bool {
        self.run(|conn| {
            diesel::sql_query("SELECT 1").execute(conn)?;
            Ok(())
        })
        .await
        .is_ok()
    }
}
