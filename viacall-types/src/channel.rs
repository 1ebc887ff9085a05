/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 *
 * Unless you explicitly state otherwise, any contribution intentionally
 * submitted for inclusion in the work by you, as defined in the Apache-2.0
 * license, shall be dual licensed as above, without any additional terms or
 * conditions.
 */

//! Channel-name validation for the hosted SDK path.
//!
//! Checks run in a fixed order: emptiness, then the character set, then the
//! length. The first failing check wins.

use thiserror::Error;

/// Longest channel name accepted, in characters.
pub const MAX_CHANNEL_NAME_LEN: usize = 32;

/// Why a channel name was rejected. The `Display` text is shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ChannelNameError {
    #[error("Channel name can't be empty.")]
    Empty,

    #[error("Only letters, numbers, hyphens and underscores allowed.")]
    InvalidCharacters,

    #[error("Channel name too long (max 32 characters).")]
    TooLong,
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// Validates `name` as given; callers that accept free-form input should trim
/// it first.
pub fn validate_channel_name(name: &str) -> Result<(), ChannelNameError> {
    if name.is_empty() {
        return Err(ChannelNameError::Empty);
    }
    if !name.chars().all(is_allowed) {
        return Err(ChannelNameError::InvalidCharacters);
    }
    if name.chars().count() > MAX_CHANNEL_NAME_LEN {
        return Err(ChannelNameError::TooLong);
    }
    Ok(())
}

/// Human-readable rejection reason, or `None` when the name is valid.
pub fn channel_name_error(name: &str) -> Option<String> {
    validate_channel_name(name).err().map(|e| e.to_string())
}
