use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

/// Gender options carried through registration
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Other,
}

/// A single user record as held by the persistent store
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct User {
    pub id: u64,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<NaiveDate>,
    pub gender: Gender,
    pub is_admin: bool,
    pub is_active: bool,
    pub verification_token: Option<String>,
    pub verification_token_expires: Option<u64>,
    pub created_at: u64,
}

/// Fields for creating a user; the store assigns the id
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<NaiveDate>,
    pub gender: Gender,
    pub is_admin: bool,
    pub is_active: bool,
    pub verification_token: Option<String>,
    pub verification_token_expires: Option<u64>,
    pub created_at: u64,
}

/// Partial update; fields left as None are untouched
#[derive(Debug, Default, Clone)]
pub struct UserUpdate {
    pub is_active: Option<bool>,
    pub password_hash: Option<String>,
    pub verification_token: Option<String>,
    pub verification_token_expires: Option<u64>,
}

/// Store-level failures
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("email already exists")]
    DuplicateEmail,
    #[error("user not found")]
    NotFound,
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Persistence contract the credential service depends on. Email lookups are
/// case-sensitive and uniqueness is enforced by the implementation, so
/// concurrent registrations for one email resolve to a single winner.
pub trait UserStore {
    fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    fn find_by_id(&self, id: u64) -> Result<Option<User>, StoreError>;
    fn create(&self, fields: NewUser) -> Result<User, StoreError>;
    fn update(&self, id: u64, changes: UserUpdate) -> Result<User, StoreError>;
}

impl<T: UserStore + ?Sized> UserStore for &T {
    fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        (**self).find_by_email(email)
    }

    fn find_by_id(&self, id: u64) -> Result<Option<User>, StoreError> {
        (**self).find_by_id(id)
    }

    fn create(&self, fields: NewUser) -> Result<User, StoreError> {
        (**self).create(fields)
    }

    fn update(&self, id: u64, changes: UserUpdate) -> Result<User, StoreError> {
        (**self).update(id, changes)
    }
}

/// HashMap-backed store for tests and single-process embedders
pub struct InMemoryUserStore {
    inner: Mutex<Inner>,
}

struct Inner {
    users: HashMap<u64, User>,
    next_id: u64,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                users: HashMap::new(),
                next_id: 1,
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Backend("user store lock poisoned".to_string()))
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UserStore for InMemoryUserStore {
    fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let inner = self.lock()?;
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    fn find_by_id(&self, id: u64) -> Result<Option<User>, StoreError> {
        let inner = self.lock()?;
        Ok(inner.users.get(&id).cloned())
    }

    fn create(&self, fields: NewUser) -> Result<User, StoreError> {
        let mut inner = self.lock()?;

        // Uniqueness check and insert happen under one lock
        if inner.users.values().any(|u| u.email == fields.email) {
            return Err(StoreError::DuplicateEmail);
        }

        let id = inner.next_id;
        inner.next_id += 1;

        let user = User {
            id,
            email: fields.email,
            password_hash: fields.password_hash,
            first_name: fields.first_name,
            last_name: fields.last_name,
            birth_date: fields.birth_date,
            gender: fields.gender,
            is_admin: fields.is_admin,
            is_active: fields.is_active,
            verification_token: fields.verification_token,
            verification_token_expires: fields.verification_token_expires,
            created_at: fields.created_at,
        };
        inner.users.insert(id, user.clone());

        Ok(user)
    }

    fn update(&self, id: u64, changes: UserUpdate) -> Result<User, StoreError> {
        let mut inner = self.lock()?;
        let user = inner.users.get_mut(&id).ok_or(StoreError::NotFound)?;

        if let Some(is_active) = changes.is_active {
            user.is_active = is_active;
        }
        if let Some(password_hash) = changes.password_hash {
            user.password_hash = password_hash;
        }
        if let Some(token) = changes.verification_token {
            user.verification_token = Some(token);
        }
        if let Some(expires) = changes.verification_token_expires {
            user.verification_token_expires = Some(expires);
        }

        Ok(user.clone())
    }
}
