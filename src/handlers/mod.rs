//! Built-in IMAP command handlers

pub mod capability;
pub mod check;
pub mod close;
pub mod create;
pub mod fetch;
pub mod list;
pub mod login;
pub mod logout;
pub mod lsub;
pub mod noop;
pub mod select;
pub mod status;
pub mod uid;

#[cfg(test)]
pub mod test_support;

pub use capability::CapabilityHandler;
pub use check::CheckHandler;
pub use close::CloseHandler;
pub use create::CreateHandler;
pub use fetch::FetchHandler;
pub use list::ListHandler;
pub use login::LoginHandler;
pub use logout::LogoutHandler;
pub use lsub::LsubHandler;
pub use noop::NoopHandler;
pub use select::SelectHandler;
pub use status::StatusHandler;
pub use uid::UidHandler;
