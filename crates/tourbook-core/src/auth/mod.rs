//! Session management for the logged-in user.
//!
//! `Session` is the single owner of "who is logged in": it loads the user
//! persisted by the previous run, replaces it on login, and clears it on
//! logout. Other components observe changes through a watch channel
//! instead of reading global state.

pub mod session;

pub use session::{Session, SessionData};
