//! In-memory registry of users keyed by name.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::User;

/// Process-lifetime store of users.
///
/// Cloning the registry yields another handle onto the same users.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use tourguide_core::{User, UserRegistry};
///
/// let registry = UserRegistry::default();
/// assert!(registry.add_user(Arc::new(User::new("jon"))));
/// assert!(!registry.add_user(Arc::new(User::new("jon"))));
/// assert_eq!(registry.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct UserRegistry {
    users: Arc<RwLock<BTreeMap<String, Arc<User>>>>,
}

impl UserRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `user` unless a user with the same name already exists.
    ///
    /// Returns `true` when the user was added.
    pub fn add_user(&self, user: Arc<User>) -> bool {
        let mut users = self.users.write();
        if users.contains_key(user.name()) {
            return false;
        }
        users.insert(user.name().to_owned(), user);
        true
    }

    /// Look a user up by name.
    #[must_use]
    pub fn user(&self, name: &str) -> Option<Arc<User>> {
        self.users.read().get(name).cloned()
    }

    /// Every registered user, ordered by name.
    #[must_use]
    pub fn all_users(&self) -> Vec<Arc<User>> {
        self.users.read().values().cloned().collect()
    }

    /// Number of registered users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    /// Whether no user is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.read().is_empty()
    }
}
