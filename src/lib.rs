//! Storm Idle: the progress and persistence engine of a rainfall idle game.
//!
//! Drops fall into a bowl; every full bowl converts into currency, which
//! buys tiers in five upgrade trees. Auto-rain and passive income keep the
//! game moving while the player is away, capped to an hour on the next load.
//!
//! Rendering, input and audio live in the host. The host drives a
//! [`Session`]: it reports collected drops, calls [`Session::frame`] once per
//! frame, saves when the frame report asks for it and on shutdown, and calls
//! [`Session::load`] once at startup.

pub mod config;
pub mod error;
pub mod logic;
pub mod save;
pub mod session;
pub mod state;
pub mod storage;
pub mod time;
pub mod upgrades;

#[cfg(test)]
mod simulator;

pub use config::Config;
pub use error::SaveError;
pub use save::OfflineResult;
pub use session::{FrameReport, Session};
pub use state::GameState;
pub use upgrades::{TierStatus, TreeId};
