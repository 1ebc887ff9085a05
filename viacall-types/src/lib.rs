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

//! Platform-agnostic types shared by the viacall client and UI.
//!
//! Nothing in this crate touches the browser, so everything here is tested
//! natively.

pub mod channel;
pub mod connection_code;
pub mod session;

pub use channel::{channel_name_error, validate_channel_name, ChannelNameError, MAX_CHANNEL_NAME_LEN};
pub use connection_code::{ConnectionCode, ConnectionCodeError};
pub use session::{SdpType, SessionDescription};
