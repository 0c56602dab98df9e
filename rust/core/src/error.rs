// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for configurator core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the configurator core
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid color '{0}': expected #rgb or #rrggbb")]
    InvalidColor(String),

    #[error("Unknown part type: {0}")]
    UnknownPartType(String),

    #[error("Mesh '{expected}' is not selected (current selection: {actual:?})")]
    MeshNotSelected {
        expected: String,
        actual: Option<String>,
    },

    #[error("Persistence error: {0}")]
    Persistence(String),
}
