// ABOUTME: Caller identity gate for service entry points
// ABOUTME: Wraps the opaque user id supplied by the external authentication system
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrocoach Contributors

use macrocoach_core::errors::{AppError, AppResult, ErrorCode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who is calling a service
///
/// Authentication itself happens upstream; the service layer only sees the
/// resulting opaque user id or its absence.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Identity {
    /// No authenticated user
    Anonymous,
    /// Authenticated user
    User(Uuid),
}

impl Identity {
    /// Identity for an authenticated user
    #[must_use]
    pub const fn user(user_id: Uuid) -> Self {
        Self::User(user_id)
    }

    /// The user id, if authenticated
    #[must_use]
    pub const fn user_id(self) -> Option<Uuid> {
        match self {
            Self::User(id) => Some(id),
            Self::Anonymous => None,
        }
    }

    /// Require an authenticated user
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` for anonymous callers
    pub fn require_user(self) -> AppResult<Uuid> {
        self.user_id().ok_or_else(AppError::auth_required)
    }

    /// Require an authenticated user, with an action-specific message
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` carrying `message` for anonymous callers
    pub fn require_user_to(self, message: &str) -> AppResult<Uuid> {
        self.user_id()
            .ok_or_else(|| AppError::new(ErrorCode::AuthRequired, message))
    }
}

/// Fail with `PermissionDenied` unless `owner` is the caller
///
/// # Errors
///
/// Returns `PermissionDenied` carrying `message` when the ids differ
pub fn ensure_owner(owner: Uuid, caller: Uuid, message: &str) -> AppResult<()> {
    if owner == caller {
        Ok(())
    } else {
        Err(AppError::permission_denied(message).with_user_id(caller))
    }
}
