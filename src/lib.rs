//! The `sms-pdu` library encodes outgoing SMS messages as GSM 03.40 SMS-SUBMIT PDUs, the
//! binary format that cellular modems accept in PDU mode, and builds the AT commands that hand
//! them over.
//!
//! Everything here is a pure function over caller-owned data: there is no I/O apart from
//! writing finished commands into a `std::io::Write` you provide.
//!
//! ```
//! use sms_pdu::pdu::EncodedPdu;
//! use sms_pdu::cmd::sms::send_sms_pdu;
//!
//! let pdu = EncodedPdu::encode(Some("+15551234567"), "+15557654321", "Test").unwrap();
//! let submission = send_sms_pdu(&pdu);
//! assert_eq!(submission.length.to_string(), "AT+CMGS=18");
//! ```
//!
//! If you'd rather not allocate, `pdu::encode_pdu` writes into any `&mut [u8]`, and
//! `pdu::HexData::encode_into` turns the result into hex in another one.

#[macro_use] extern crate log;
#[macro_use] extern crate failure_derive;
#[macro_use] extern crate derive_is_enum_variant;

macro_rules! check_len {
    ($b:ident, $needed:expr) => {
        let needed = $needed;
        if $b.len() < needed {
            return Err(crate::errors::EncodeError::BufferTooSmall {
                needed,
                available: $b.len()
            });
        }
    }
}

pub mod errors;
pub mod gsm_encoding;
pub mod pdu;
pub mod at;
pub mod cmd;

pub use crate::errors::{EncodeError, EncodeResult};
pub use crate::gsm_encoding::pack_text_7bit;
pub use crate::pdu::{encode_pdu, pack_phone_number, EncodedPdu, HexData};
