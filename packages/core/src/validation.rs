use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::types::{NewPost, NewProfile, NewUser, PostPatch, ProfilePatch, UserPatch};

/// Errors returned when a request payload fails validation.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("email must look like local@domain, got: {0:?}")]
    InvalidEmail(String),
}

/// Validate a [`NewUser`] creation payload.
///
/// Returns the first [`ValidationError`] found, checking fields in
/// declaration order.
pub fn validate_new_user(user: &NewUser) -> Result<(), ValidationError> {
    non_empty("firstName", &user.first_name)?;
    non_empty("lastName", &user.last_name)?;
    validate_email(&user.email)
}

/// Validate the name and email fields of a [`UserPatch`]. Only fields present
/// in the patch are checked; subscription lists are maintained by the
/// subscription operations, not by request payloads.
pub fn validate_user_patch(patch: &UserPatch) -> Result<(), ValidationError> {
    if let Some(v) = &patch.first_name {
        non_empty("firstName", v)?;
    }
    if let Some(v) = &patch.last_name {
        non_empty("lastName", v)?;
    }
    if let Some(v) = &patch.email {
        validate_email(v)?;
    }
    Ok(())
}

pub fn validate_new_post(post: &NewPost) -> Result<(), ValidationError> {
    non_empty("title", &post.title)?;
    non_empty("content", &post.content)?;
    non_empty("userId", &post.user_id)
}

pub fn validate_post_patch(patch: &PostPatch) -> Result<(), ValidationError> {
    if let Some(v) = &patch.title {
        non_empty("title", v)?;
    }
    if let Some(v) = &patch.content {
        non_empty("content", v)?;
    }
    Ok(())
}

pub fn validate_new_profile(profile: &NewProfile) -> Result<(), ValidationError> {
    non_empty("sex", &profile.sex)?;
    non_empty("country", &profile.country)?;
    non_empty("memberTypeId", &profile.member_type_id)?;
    non_empty("userId", &profile.user_id)
}

pub fn validate_profile_patch(patch: &ProfilePatch) -> Result<(), ValidationError> {
    if let Some(v) = &patch.sex {
        non_empty("sex", v)?;
    }
    if let Some(v) = &patch.country {
        non_empty("country", v)?;
    }
    if let Some(v) = &patch.member_type_id {
        non_empty("memberTypeId", v)?;
    }
    Ok(())
}

// --- helpers -----------------------------------------------------------------

fn non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::EmptyField(field))
    } else {
        Ok(())
    }
}

fn validate_email(s: &str) -> Result<(), ValidationError> {
    if EMAIL_RE.is_match(s) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail(s.to_string()))
    }
}

/// `^[^@\s]+@[^@\s]+$`
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+$").expect("invalid email regex"));

// --- tests -------------------------------------------------------------------
