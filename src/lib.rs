//! Ethix localized content gateway.
//!
//! Serves the sustainability catalog site's content: locale-prefixed
//! routing, CMS-backed catalog and blog data, and localized UI strings.

pub mod catalog;
pub mod cms;
pub mod config;
pub mod i18n;
pub mod security;
pub mod server;
