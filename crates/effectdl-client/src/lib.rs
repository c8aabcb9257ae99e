//! Remote client for the effect-collection service.
//!
//! [`EffectService`] drives the fetch-merge-persist loop against the
//! paginated list endpoint, mirrors records into an observable
//! [`effectdl_core::EffectCollection`], and caches effect images through
//! an injected [`effectdl_core::EffectImageRepository`].

pub mod config;
pub mod service;
mod wire;

pub use config::ClientConfig;
pub use service::{EffectService, ImageFetchOutcome};
