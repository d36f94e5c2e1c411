use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Sentinel contact type meaning "do not filter".
pub const ALL_CONTACT_TYPES: &str = "All";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(rename = "phoneNumber")]
    pub phone_number: String,
    #[serde(rename = "date")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(rename = "contactOf")]
    pub owner_id: Uuid,
    #[serde(rename = "contactName")]
    pub contact_name: String,
    #[serde(rename = "contactEmail")]
    pub contact_email: String,
    #[serde(rename = "contactPhone")]
    pub contact_phone: String,
    #[serde(rename = "contactType")]
    pub contact_type: String,
    #[serde(rename = "date")]
    pub created_at: DateTime<Utc>,
}

/// An owner as returned by the read endpoints, annotated with its contacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerWithContacts {
    #[serde(flatten)]
    pub owner: Owner,
    pub contacts: Vec<Contact>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OwnerRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(
        default,
        rename = "phoneNumber",
        alias = "phone",
        deserialize_with = "lenient_string"
    )]
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactRequest {
    #[serde(default, rename = "contactName", deserialize_with = "lenient_string")]
    pub contact_name: Option<String>,
    #[serde(default, rename = "contactEmail", deserialize_with = "lenient_string")]
    pub contact_email: Option<String>,
    #[serde(default, rename = "contactPhone", deserialize_with = "lenient_string")]
    pub contact_phone: Option<String>,
    #[serde(default, rename = "contactType", deserialize_with = "lenient_string")]
    pub contact_type: Option<String>,
}

/// Accepts any JSON scalar for a text field and keeps its string form.
/// `null` counts as absent.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(v) => Ok(Some(v.to_string())),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOwner {
    pub name: String,
    pub email: String,
    pub phone_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    pub owner_id: Uuid,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub contact_type: String,
}

/// Fields to overwrite on an existing owner. `None` leaves the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnerPatch {
    pub name: Option<String>,
    pub phone_number: Option<String>,
}

impl OwnerPatch {
    pub fn from_request(request: &OwnerRequest) -> Self {
        Self {
            name: non_empty(&request.name),
            phone_number: non_empty(&request.phone_number),
        }
    }

    pub fn apply(&self, owner: &mut Owner) {
        if let Some(name) = &self.name {
            owner.name.clone_from(name);
        }
        if let Some(phone_number) = &self.phone_number {
            owner.phone_number.clone_from(phone_number);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone_number.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactPatch {
    pub contact_name: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_type: Option<String>,
}

impl ContactPatch {
    pub fn from_request(request: &ContactRequest) -> Self {
        Self {
            contact_name: non_empty(&request.contact_name),
            contact_phone: non_empty(&request.contact_phone),
            contact_type: non_empty(&request.contact_type),
        }
    }

    pub fn apply(&self, contact: &mut Contact) {
        if let Some(name) = &self.contact_name {
            contact.contact_name.clone_from(name);
        }
        if let Some(phone) = &self.contact_phone {
            contact.contact_phone.clone_from(phone);
        }
        if let Some(contact_type) = &self.contact_type {
            contact.contact_type.clone_from(contact_type);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.contact_name.is_none() && self.contact_phone.is_none() && self.contact_type.is_none()
    }
}

/// Contact type filter parsed from a path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeFilter {
    Any,
    Exact(String),
}

impl TypeFilter {
    pub fn parse(raw: &str) -> Self {
        if raw == ALL_CONTACT_TYPES {
            Self::Any
        } else {
            Self::Exact(raw.to_string())
        }
    }

    pub fn as_exact(&self) -> Option<&str> {
        match self {
            Self::Any => None,
            Self::Exact(value) => Some(value),
        }
    }

    pub fn matches(&self, contact_type: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(value) => value == contact_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnerUpsert {
    Created(Owner),
    Updated(Owner),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactUpsert {
    Created(Contact),
    Updated(Contact),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub msg: String,
}

impl MessageResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}
