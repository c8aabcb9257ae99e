//! Core domain for effectdl: effect records, the shared error type,
//! observable state containers, and the image repository trait.
//!
//! This crate holds no I/O of its own. Persistent storage lives in
//! `effectdl-infrastructure`, the remote endpoints in `effectdl-client`.

pub mod effect;
pub mod error;
pub mod repository;
pub mod state;

pub use effect::{Effect, EffectImage};
pub use error::{DlError, Result};
pub use repository::EffectImageRepository;
pub use state::{EffectCollection, SessionState, SessionTokens, StateCell};
