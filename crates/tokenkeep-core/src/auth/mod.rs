//! Credential manager.
//!
//! `Auth` keeps one credential under a configurable storage name, caches
//! the parsed `Token` in memory and answers questions about it. Storage is
//! injected through `SettingsStorage`; `Auth::new` builds the backend from
//! `AuthOptions`.
//!
//! Operations are sequential per instance (mutating calls take `&mut self`).
//! Separate instances share state only through their storage.

pub mod manager;

pub use manager::Auth;
