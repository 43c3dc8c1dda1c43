//! Building the AT commands that hand an SMS-SUBMIT PDU to a modem.
//!
//! Sending in PDU mode is a two-step exchange: `AT+CMGS=<length>` makes the modem answer with a
//! `> ` prompt, after which the PDU is sent as hex and terminated with Ctrl-Z. The length is
//! that of the TPDU, i.e. the PDU *without* the service center address in front of it.
//!
//! **NB:** The modem has to be in PDU mode (`set_sms_textmode(false)`) first. If the PDU leaves
//! the service center out, the modem falls back to the one set with `set_smsc_addr`.
//!
//! Nothing here talks to a modem; the commands are handed to whatever owns the serial port.
use std::io::Write;
use crate::at::*;
use crate::errors::*;
use crate::pdu::{AddressType, EncodedPdu, CTRL_Z};

/// The two commands that submit one PDU.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PduSubmission {
    /// `AT+CMGS=<tpdu length>`.
    pub length: AtCommand,
    /// The PDU as hex, followed by Ctrl-Z.
    pub body: AtCommand
}
impl PduSubmission {
    /// Write the exchange to `w`: the `AT+CMGS` line ending in a carriage return, then the body.
    ///
    /// A real driver should wait for the modem's `> ` prompt between the two; this just writes
    /// them back to back.
    pub fn write_to<W: Write>(&self, w: &mut W) -> EncodeResult<()> {
        trace!("sending data: {}", self.length);
        write!(w, "{}\r", self.length)?;
        trace!("sending data: {:?}", self.body.to_string());
        write!(w, "{}", self.body)?;
        w.flush()?;
        Ok(())
    }
}
/// Prepare a PDU for sending (`AT+CMGS`).
pub fn send_sms_pdu(pdu: &EncodedPdu) -> PduSubmission {
    let length = AtCommand::Equals {
        param: "+CMGS".into(),
        value: AtValue::Integer(pdu.tpdu_len() as u32)
    };
    let text = format!("{}{}", pdu.hex(), CTRL_Z as char);
    PduSubmission {
        length,
        body: AtCommand::Text { text }
    }
}
/// Set whether the modem will use text mode or not (`AT+CMGF`).
pub fn set_sms_textmode(text: bool) -> AtCommand {
    AtCommand::Equals {
        param: "+CMGF".into(),
        value: AtValue::Integer(if text { 1 } else { 0 })
    }
}
/// Set the address of the SMS Service Center (`AT+CSCA`).
///
/// `sca` is given as international, with or without a leading `+`.
pub fn set_smsc_addr(sca: &str) -> AtCommand {
    let sca = format!("+{}", crate::pdu::strip_international_prefix(sca));
    let tosca: u8 = AddressType::default().into();
    AtCommand::Equals {
        param: "+CSCA".into(),
        value: AtValue::Array(vec![
            AtValue::String(sca),
            AtValue::Integer(tosca as u32)
        ])
    }
}
