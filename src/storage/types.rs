use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::error::StoreError;

/// Opaque key of a stored user.
///
/// Minted from the record set's counter (`"1"`, `"2"`, ...), but callers should
/// treat it as an arbitrary string: ids arriving over HTTP are never parsed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    /// Numeric value of the id, if it was minted by the counter.
    pub fn index(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl From<u64> for UserId {
    fn from(index: u64) -> Self {
        Self(index.to_string())
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub created_at: DateTime<Utc>,
    pub display_name: String,
    pub email: String,
}

impl User {
    pub fn new(display_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            created_at: Utc::now(),
            display_name: display_name.into(),
            email: email.into(),
        }
    }

    /// Field-level merge: every set field of `patch` replaces ours.
    pub fn apply(&mut self, patch: UserPatch) {
        if let Some(display_name) = patch.display_name.filter(|v| !v.is_empty()) {
            self.display_name = display_name;
        }
        if let Some(email) = patch.email.filter(|v| !v.is_empty()) {
            self.email = email;
        }
    }
}

/// Partial update of a [`User`]. `None` and `Some("")` both mean "leave as is".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub display_name: Option<String>,
    pub email: Option<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        let unset = |field: &Option<String>| field.as_deref().is_none_or(str::is_empty);
        unset(&self.display_name) && unset(&self.email)
    }
}

pub type Users = BTreeMap<UserId, User>;

/// The whole persisted state: every user plus the last assigned index.
///
/// Serialized as `{"increment": <u64>, "users": {<id>: <user>}}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RecordSet {
    pub increment: u64,
    pub users: Users,
}

impl RecordSet {
    /// Raises the counter to the highest numeric id present.
    ///
    /// A file edited by hand may carry a counter behind its own records; without
    /// this the next `add` would overwrite one of them.
    pub fn reconcile_increment(&mut self) {
        let highest = self.users.keys().filter_map(UserId::index).max();
        if let Some(highest) = highest
            && highest > self.increment
        {
            self.increment = highest;
        }
    }

    /// Mints the next id and stores `user` under it.
    ///
    /// Returns `None`, leaving the set untouched, once the counter is at `u64::MAX`.
    pub fn add(&mut self, user: User) -> Option<UserId> {
        self.increment = self.increment.checked_add(1)?;
        let id = UserId::from(self.increment);
        self.users.insert(id.clone(), user);
        Some(id)
    }

    pub fn get(&self, id: &UserId) -> Result<&User, StoreError> {
        self.users
            .get(id)
            .ok_or_else(|| StoreError::NotFound { id: id.clone() })
    }

    pub fn update(&mut self, id: &UserId, patch: UserPatch) -> Result<&User, StoreError> {
        let user = self
            .users
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound { id: id.clone() })?;
        user.apply(patch);
        Ok(user)
    }

    pub fn remove(&mut self, id: &UserId) -> Result<User, StoreError> {
        self.users
            .remove(id)
            .ok_or_else(|| StoreError::NotFound { id: id.clone() })
    }
}
