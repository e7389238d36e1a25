use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use super::ids::{IdGenerator, SequentialIds};
use super::{StoreError, StoreResult};

/// A stored user. `age` is an integer everywhere it is serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub email: String,
}

/// Body of create and update requests; all three fields are overwritten on update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInput {
    pub name: String,
    pub age: u32,
    pub email: String,
}

/// Shape returned by `GET /users/{id}`: age and email are left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: String,
    pub name: String,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
        }
    }
}

/// Users keyed by id.
#[derive(Clone)]
pub struct UserStore {
    users: Arc<RwLock<HashMap<String, User>>>,
    ids: Arc<dyn IdGenerator>,
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UserStore {
    pub fn new() -> Self {
        Self::with_ids(Arc::new(SequentialIds::from_clock()))
    }

    pub fn with_ids(ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            ids,
        }
    }

    pub fn create(&self, input: UserInput) -> StoreResult<User> {
        let mut users = self.users.write().map_err(|_| StoreError::Poisoned("users"))?;

        let id = loop {
            let candidate = self.ids.next_id();
            if !users.contains_key(&candidate) {
                break candidate;
            }
        };

        let user = User {
            id: id.clone(),
            name: input.name,
            age: input.age,
            email: input.email,
        };
        users.insert(id, user.clone());

        tracing::debug!("Created user {}", user.id);
        Ok(user)
    }

    pub fn get(&self, id: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().map_err(|_| StoreError::Poisoned("users"))?;
        Ok(users.get(id).cloned())
    }

    /// Overwrites name, age and email. Returns `None` when the id is unknown.
    pub fn update(&self, id: &str, input: UserInput) -> StoreResult<Option<User>> {
        let mut users = self.users.write().map_err(|_| StoreError::Poisoned("users"))?;

        let Some(user) = users.get_mut(id) else {
            return Ok(None);
        };
        user.name = input.name;
        user.age = input.age;
        user.email = input.email;

        tracing::debug!("Updated user {}", id);
        Ok(Some(user.clone()))
    }

    /// Returns whether a user was removed.
    pub fn delete(&self, id: &str) -> StoreResult<bool> {
        let mut users = self.users.write().map_err(|_| StoreError::Poisoned("users"))?;
        let removed = users.remove(id).is_some();
        if removed {
            tracing::debug!("Deleted user {}", id);
        }
        Ok(removed)
    }

    pub fn len(&self) -> StoreResult<usize> {
        let users = self.users.read().map_err(|_| StoreError::Poisoned("users"))?;
        Ok(users.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }
}
