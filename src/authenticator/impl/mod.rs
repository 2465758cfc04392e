//! Login provider implementations

pub mod basic;

pub use basic::BasicAuthenticator;
