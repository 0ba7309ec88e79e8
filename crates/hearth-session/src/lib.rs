//! Cookie-bound server-side sessions.
//!
//! This crate provides:
//! - Self-certifying session identifiers sealed with AES-256-GCM
//! - An in-memory session store behind a pluggable [`SessionStore`] trait
//! - A [`SessionManager`] that maps request cookies to sessions
//! - A background reaper that evicts idle sessions
//!
//! # Example
//!
//! ```rust,ignore
//! use hearth_session::{RequestCookies, SessionConfig, SessionManager};
//!
//! let config = SessionConfig::new().with_session_key(key);
//! let manager = SessionManager::new(config);
//! let reaper = manager.spawn_reaper();
//!
//! let lookup = manager.get_or_create_session(&RequestCookies::parse(headers)).await?;
//! lookup.session.write().set("user", "alice");
//! if let Some(cookie) = lookup.set_cookie {
//!     response.append_header("Set-Cookie", cookie.to_header_value());
//! }
//! ```

mod config;
mod cookies;
mod crypto;
mod error;
mod id;
mod manager;
mod reaper;
mod session;
mod store;

pub use config::{
    CookieSettings, DEFAULT_COOKIE_NAME, DEFAULT_GC_RATE, DEFAULT_MAX_LIFE, MIN_GC_RATE,
    PLACEHOLDER_SESSION_KEY, SessionConfig, SessionOptions,
};
pub use cookies::RequestCookies;
pub use crypto::{KEY_LEN, NONCE_LEN, TAG_LEN, armor, dearmor, decrypt, encrypt, fill_random};
pub use error::{Error, Result};
pub use id::{SID_BLOCK_LEN, SID_MARKER, generate_session_id, validate_session_id};
pub use manager::{MAX_ID_ATTEMPTS, ManagerStats, SessionLookup, SessionManager};
pub use reaper::ReaperHandle;
pub use session::{Session, SessionCookie, SharedSession};
pub use store::{MemoryStore, SessionStore};
