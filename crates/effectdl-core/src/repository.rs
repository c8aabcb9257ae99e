//! Image repository trait.

use async_trait::async_trait;

use crate::effect::EffectImage;
use crate::error::Result;

/// Persistent store for effect images, keyed by effect id.
///
/// Implementations must survive process restarts. Writers rely on
/// per-key upsert atomicity only; keys are independent, so concurrent
/// upserts for different ids need no external locking.
#[async_trait]
pub trait EffectImageRepository: Send + Sync {
    /// Stores an image, overwriting any existing entry for the same id.
    ///
    /// Idempotent: calling twice with the same id leaves exactly one
    /// entry, with the later payload winning.
    async fn upsert(&self, image: &EffectImage) -> Result<()>;

    /// Looks up an image by effect id. An unknown id is `Ok(None)`, never
    /// an error.
    async fn get(&self, effect_id: &str) -> Result<Option<EffectImage>>;

    /// Returns every cached image.
    async fn get_all(&self) -> Result<Vec<EffectImage>>;

    /// Removes the entry for an id. Removing a missing id is a no-op.
    async fn delete(&self, effect_id: &str) -> Result<()>;
}
