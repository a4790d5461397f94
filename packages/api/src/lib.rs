//! Request and response types for the SocialGraph HTTP API.
//!
//! Stored records ([`socialgraph::User`], [`socialgraph::Post`],
//! [`socialgraph::Profile`]) are returned as-is; this crate adds the request
//! bodies and the auxiliary response documents.
//!
//! # Endpoints covered
//!
//! | Method | Path | Type |
//! |--------|------|------|
//! | POST | `/users` | [`CreateUserRequest`] → `User` |
//! | PATCH | `/users/{id}` | [`ChangeUserRequest`] → `User` |
//! | POST | `/users/{id}/subscribeTo` | [`SubscribeRequest`] → `User` |
//! | POST | `/users/{id}/unsubscribeFrom` | [`SubscribeRequest`] → `User` |
//! | POST | `/posts` | [`CreatePostRequest`] → `Post` |
//! | PATCH | `/posts/{id}` | [`ChangePostRequest`] → `Post` |
//! | POST | `/profiles` | [`CreateProfileRequest`] → `Profile` |
//! | PATCH | `/profiles/{id}` | [`ChangeProfileRequest`] → `Profile` |
//! | GET | `/health` | → [`HealthResponse`] |
//!
//! Every error response carries an [`ErrorResponse`] body.

pub mod error;
pub mod health;
pub mod user;

pub use error::ErrorResponse;
pub use health::{CollectionCounts, HealthResponse};
pub use user::{ChangeUserRequest, CreateUserRequest, SubscribeRequest};

/// Body of `POST /posts`.
pub type CreatePostRequest = socialgraph::NewPost;
/// Body of `PATCH /posts/{id}`.
pub type ChangePostRequest = socialgraph::PostPatch;
/// Body of `POST /profiles`.
pub type CreateProfileRequest = socialgraph::NewProfile;
/// Body of `PATCH /profiles/{id}`.
pub type ChangeProfileRequest = socialgraph::ProfilePatch;
