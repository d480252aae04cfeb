//! Lazily populated role options for selection widgets.
//!
//! # Design
//! The cache is an ordinary value owned by whoever needs it; there is no
//! global instance. An empty list means "not fetched yet", so a server that
//! legitimately has no roles is asked again on every `get()`.
//!
//! The lock only guards the vector. It is released while the list call is in
//! flight, so two concurrent `get()` calls on an empty cache may both fetch;
//! both compute the same options from the same fixed filter and the later
//! write wins.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::query::Filter;
use crate::types::SysRole;

/// Page size of the refresh call.
pub const ROLE_PAGE_SIZE: u32 = 20;

/// Where the cache gets its roles from.
pub trait RoleSource {
    fn list_roles(&self, filter: &Filter) -> Result<Envelope<Vec<SysRole>>, ApiError>;
}

impl<S: RoleSource + ?Sized> RoleSource for &S {
    fn list_roles(&self, filter: &Filter) -> Result<Envelope<Vec<SysRole>>, ApiError> {
        (**self).list_roles(filter)
    }
}

impl<S: RoleSource + ?Sized> RoleSource for Arc<S> {
    fn list_roles(&self, filter: &Filter) -> Result<Envelope<Vec<SysRole>>, ApiError> {
        (**self).list_roles(filter)
    }
}

/// `{ value: role, label: roleName }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleOption {
    pub value: String,
    pub label: String,
}

impl From<&SysRole> for RoleOption {
    fn from(role: &SysRole) -> Self {
        Self {
            value: role.role.clone(),
            label: role.role_name.clone(),
        }
    }
}

/// Role options for selection lists, loaded from `S` on first use and kept
/// until `reset`.
pub struct RoleCache<S> {
    source: S,
    roles: Mutex<Vec<RoleOption>>,
}

impl<S: RoleSource> RoleCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            roles: Mutex::new(Vec::new()),
        }
    }

    /// Cached options, fetching page 1 of 20 roles when the cache is empty.
    ///
    /// A transport error leaves the cache empty. A `success: false` reply is
    /// stored like any other, which in practice means nothing is cached.
    pub fn get(&self) -> Result<Vec<RoleOption>, ApiError> {
        {
            let roles = self.lock();
            if !roles.is_empty() {
                return Ok(roles.clone());
            }
        }

        debug!("role cache empty, fetching");
        let envelope = self.source.list_roles(&Filter::paged(1, ROLE_PAGE_SIZE))?;
        if !envelope.success {
            warn!(code = envelope.code, message = %envelope.message, "role list refused");
        }
        let options: Vec<RoleOption> = envelope.data.iter().map(RoleOption::from).collect();
        *self.lock() = options.clone();
        info!(count = options.len(), "role cache refreshed");
        Ok(options)
    }

    /// Empty the cache so the next `get()` fetches again.
    pub fn reset(&self) {
        self.lock().clear();
        debug!("role cache reset");
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn lock(&self) -> MutexGuard<'_, Vec<RoleOption>> {
        self.roles.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
