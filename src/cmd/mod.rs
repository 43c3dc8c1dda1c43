//! Builders for the AT commands used to send SMS messages.
//!
//! Each function returns a typed `AtCommand` (or a small bundle of them) instead of sending
//! anything, so the caller's transport decides how and when they go out.
pub mod sms;
