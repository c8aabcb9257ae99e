//! Observable state containers.
//!
//! The originals kept the effect list and the session tokens in
//! process-wide singletons. Here they are explicit containers the caller
//! constructs and injects into whatever needs them; the "single shared
//! instance, many observers" contract is preserved by cloning an `Arc`
//! around the container.

mod cell;
mod collection;
mod session;

pub use cell::StateCell;
pub use collection::EffectCollection;
pub use session::{SessionState, SessionTokens};
