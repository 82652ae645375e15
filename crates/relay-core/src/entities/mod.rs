//! Domain entities

mod session;

pub use session::Session;
