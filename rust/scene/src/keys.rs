// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arena key types for model instances.

use slotmap::new_key_type;

new_key_type! {
    /// Key for a node in a [`ModelInstance`](crate::ModelInstance).
    pub struct NodeKey;

    /// Key for a material owned by one model instance.
    pub struct MaterialKey;
}
