// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP route handlers.

pub mod health;
pub mod models;
pub mod parts;
pub mod pricing;
pub mod render;
pub mod taxonomy;

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::ApiError;

/// Time since the Unix epoch.
pub(crate) fn unix_now() -> Result<Duration, ApiError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| ApiError::Internal(e.to_string()))
}
