//! UI session flow: Idle → Input → Analyzing → Results | Error.
//!
//! `machine` is the pure transition function, `controller` owns one session's
//! snapshot and the analysis task, `store` keeps sessions in memory.

pub mod controller;
pub mod machine;
pub mod store;

pub use controller::SessionController;
pub use machine::{Phase, SessionSnapshot, TransitionError};
pub use store::SessionStore;
