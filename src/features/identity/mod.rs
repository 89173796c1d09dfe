//! Anonymous identity for report submissions.

mod provider;

pub use provider::{AnonymousIdentityProvider, IdentityProvider};
