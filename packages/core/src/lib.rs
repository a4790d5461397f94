//! Core types for the SocialGraph service.
//!
//! This crate holds the data model shared by the HTTP node, the API type
//! layer and the conformance suite. It has no I/O of its own.
//!
//! # Crate layout
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`types`] | Stored records [`User`], [`Post`], [`Profile`] and their create/patch payloads |
//! | [`validation`] | Payload checks such as [`validate_new_user`] |
//! | [`graph`] | [`SubscriptionGraph`]: derived subscription views and consistency audit |
//!
//! # Quick start
//!
//! ```rust,ignore
//! use socialgraph::{validate_new_user, NewUser, User};
//!
//! let data = NewUser {
//!     first_name: "Ada".into(),
//!     last_name: "Lovelace".into(),
//!     email: "ada@example.com".into(),
//! };
//! validate_new_user(&data).expect("payload should be valid");
//! let user = User::new(socialgraph::new_id(), data);
//! ```

pub mod graph;
pub mod types;
pub mod validation;

pub use graph::{GraphAudit, SubscriptionGraph};
pub use types::{
    new_id, NewPost, NewProfile, NewUser, Post, PostPatch, Profile, ProfilePatch, User, UserPatch,
};
pub use validation::{
    validate_new_post, validate_new_profile, validate_new_user, validate_post_patch,
    validate_profile_patch, validate_user_patch, ValidationError,
};
