use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate};
use log::debug;

use crate::query::Query;
use crate::record::{Field, Identified, OptionalField, Record, Value};

pub type ContactName = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactStatus {
    Active,
    Inactive,
    New,
}

impl ContactStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactStatus::Active => "active",
            ContactStatus::Inactive => "inactive",
            ContactStatus::New => "new",
        }
    }
}

impl fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContactStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "active" => Ok(ContactStatus::Active),
            "inactive" => Ok(ContactStatus::Inactive),
            "new" => Ok(ContactStatus::New),
            other => Err(anyhow::anyhow!("Unknown contact status `{other}`")),
        }
    }
}

/// A birth date as callers tend to have it: a date, epoch milliseconds, or text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BirthDate {
    Date(NaiveDate),
    Timestamp(i64),
    Text(String),
}

impl BirthDate {
    /// Normalises to a calendar date. Text may be `YYYY-MM-DD` or RFC 3339.
    pub fn to_date(&self) -> anyhow::Result<NaiveDate> {
        match self {
            BirthDate::Date(date) => Ok(*date),
            BirthDate::Timestamp(millis) => DateTime::from_timestamp_millis(*millis)
                .map(|dt| dt.date_naive())
                .ok_or_else(|| anyhow::anyhow!("Timestamp {millis} is out of range")),
            BirthDate::Text(text) => NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .or_else(|_| DateTime::parse_from_rfc3339(text).map(|dt| dt.date_naive()))
                .map_err(|e| anyhow::anyhow!("Unable to parse birth date `{text}`: {e}")),
        }
    }
}

impl From<BirthDate> for Value {
    fn from(value: BirthDate) -> Self {
        match value {
            BirthDate::Date(date) => Value::Date(date),
            BirthDate::Timestamp(millis) => Value::Integer(millis),
            BirthDate::Text(text) => Value::String(text),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: Option<String>,
    pub zip: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub id: u64,
    pub name: ContactName,
    pub birthday: Option<BirthDate>,
    pub status: ContactStatus,
    pub address: Address,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactEvent {
    Deleted {
        contact_id: u64,
    },
    StatusChanged {
        contact_id: u64,
        old_status: ContactStatus,
        new_status: ContactStatus,
    },
}

impl ContactEvent {
    pub fn contact_id(&self) -> u64 {
        match self {
            ContactEvent::Deleted { contact_id } => *contact_id,
            ContactEvent::StatusChanged { contact_id, .. } => *contact_id,
        }
    }
}

impl Contact {
    pub fn birth_date(&self) -> anyhow::Result<Option<NaiveDate>> {
        self.birthday.as_ref().map(BirthDate::to_date).transpose()
    }

    pub fn set_status(&mut self, status: ContactStatus) -> ContactEvent {
        let old_status = std::mem::replace(&mut self.status, status);
        debug!("Contact {} status {old_status} -> {status}", self.id);
        ContactEvent::StatusChanged {
            contact_id: self.id,
            old_status,
            new_status: status,
        }
    }

    pub fn deleted(&self) -> ContactEvent {
        ContactEvent::Deleted {
            contact_id: self.id,
        }
    }
}

/// A bare name becomes a new active contact with id 0.
impl From<&str> for Contact {
    fn from(name: &str) -> Self {
        Contact {
            id: 0,
            name: name.to_string(),
            birthday: None,
            status: ContactStatus::Active,
            address: Address::default(),
        }
    }
}

const ID: Field<Contact, u64> = Field::new("id", |c: &Contact| &c.id);
const NAME: Field<Contact, str> = Field::new("name", |c: &Contact| c.name.as_str());
const BIRTHDAY: OptionalField<Contact, BirthDate> =
    OptionalField::new("birthday", |c: &Contact| c.birthday.as_ref());
const STATUS: Field<Contact, ContactStatus> = Field::new("status", |c: &Contact| &c.status);
const STREET: Field<Contact, str> = Field::new("street", |c: &Contact| c.address.street.as_str());
const CITY: Field<Contact, str> = Field::new("city", |c: &Contact| c.address.city.as_str());
const STATE: OptionalField<Contact, str> =
    OptionalField::new("state", |c: &Contact| c.address.state.as_deref());
const ZIP: OptionalField<Contact, str> =
    OptionalField::new("zip", |c: &Contact| c.address.zip.as_deref());

impl Identified for Contact {
    fn id(&self) -> u64 {
        self.id
    }
}

impl Record for Contact {
    fn field_names(&self) -> Vec<&str> {
        let mut fields = vec![ID.name(), NAME.name()];
        if self.birthday.is_some() {
            fields.push(BIRTHDAY.name());
        }
        fields.extend([STATUS.name(), STREET.name(), CITY.name()]);
        if self.address.state.is_some() {
            fields.push(STATE.name());
        }
        if self.address.zip.is_some() {
            fields.push(ZIP.name());
        }
        fields
    }

    fn value(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(self.id.into()),
            "name" => Some(self.name.as_str().into()),
            "birthday" => self.birthday.clone().map(Value::from),
            "status" => Some(self.status.as_str().into()),
            "street" => Some(self.address.street.as_str().into()),
            "city" => Some(self.address.city.as_str().into()),
            "state" => self.address.state.as_deref().map(Value::from),
            "zip" => self.address.zip.as_deref().map(Value::from),
            _ => None,
        }
    }
}

impl<'a, E: 'a> Query<'a, Contact, E> {
    pub fn id(&mut self, predicate: impl Fn(&u64) -> bool + 'a) -> &mut Self {
        self.field(ID, predicate)
    }

    pub fn name(&mut self, predicate: impl Fn(&str) -> bool + 'a) -> &mut Self {
        self.field(NAME, predicate)
    }

    pub fn birthday(&mut self, predicate: impl Fn(&BirthDate) -> bool + 'a) -> &mut Self {
        self.optional_field(BIRTHDAY, predicate)
    }

    pub fn status(&mut self, predicate: impl Fn(&ContactStatus) -> bool + 'a) -> &mut Self {
        self.field(STATUS, predicate)
    }

    pub fn street(&mut self, predicate: impl Fn(&str) -> bool + 'a) -> &mut Self {
        self.field(STREET, predicate)
    }

    pub fn city(&mut self, predicate: impl Fn(&str) -> bool + 'a) -> &mut Self {
        self.field(CITY, predicate)
    }

    pub fn state(&mut self, predicate: impl Fn(&str) -> bool + 'a) -> &mut Self {
        self.optional_field(STATE, predicate)
    }

    pub fn zip(&mut self, predicate: impl Fn(&str) -> bool + 'a) -> &mut Self {
        self.optional_field(ZIP, predicate)
    }
}

pub fn search_contacts<'c>(contacts: &'c [Contact], query: &Query<'_, Contact>) -> Vec<&'c Contact> {
    debug!("Searching {} contacts with {query:?}", contacts.len());
    query.apply(contacts)
}
