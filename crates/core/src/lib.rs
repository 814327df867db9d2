//! Core types, matching, and budget-window arithmetic for the paywall
//! metering engine.

pub mod conditions;
pub mod entitlements;
pub mod error;
pub mod limits;
pub mod rules;
pub mod user_rules;
pub mod window;

pub use conditions::*;
pub use entitlements::*;
pub use error::{Error, Result};
pub use rules::*;
pub use user_rules::*;
pub use window::*;
