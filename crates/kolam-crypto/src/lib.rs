//! Kolam Crypto Library
//!
//! Password digests for the credential store and the random secret used to
//! sign session tokens when none is configured.
//!
//! Digests are unsalted SHA-256 so that rows written by earlier deployments
//! keep authenticating. Moving to a salted KDF needs a rehash-on-login path.

pub mod keys;
pub mod password;
