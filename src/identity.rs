//! Identity-domain identifiers, redacted secrets, and the handshake data model.

pub mod id;
pub mod model;
pub mod secret;

pub use id::*;
pub use model::*;
pub use secret::*;
