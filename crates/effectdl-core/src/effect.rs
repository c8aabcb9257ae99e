//! Effect domain models.

use serde::{Deserialize, Serialize};

/// One effect record from the remote collection.
///
/// `id` is the stable identity: it keys the local image cache and drives
/// de-duplication in the observable collection. `hash_id` is the opaque
/// token the remote "change" endpoint expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Effect {
    /// Stable, unique record identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Opaque selection token for the change-effect endpoint.
    pub hash_id: String,
}

/// A cached effect image, keyed by the owning effect's id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectImage {
    /// Equals `Effect::id`.
    pub id: String,
    /// Raw JPEG bytes.
    pub bytes: Vec<u8>,
}

impl EffectImage {
    pub fn new(id: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            id: id.into(),
            bytes,
        }
    }
}
