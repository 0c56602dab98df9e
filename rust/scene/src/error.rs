// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for scene operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or driving a model
#[derive(Error, Debug)]
pub enum Error {
    #[error("glTF import failed: {0}")]
    Gltf(#[from] gltf::Error),

    #[error("Asset contains no scene")]
    NoScene,

    #[error("Mesh not found: {0}")]
    MeshNotFound(String),

    #[error("Core error: {0}")]
    Core(#[from] gunsmith_core::Error),
}
