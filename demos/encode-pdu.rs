//! Encode an SMS and print the AT exchange that would send it.
//!
//! Usage: encode-pdu [--smsc <number>] <destination> <text...>
use sms_pdu::cmd::sms::{send_sms_pdu, set_sms_textmode};
use sms_pdu::pdu::EncodedPdu;
use std::process;

fn main() {
    env_logger::init().unwrap();
    let mut args = ::std::env::args().skip(1).collect::<Vec<_>>();
    let mut smsc = None;
    if args.first().map(|a| a == "--smsc").unwrap_or(false) && args.len() > 1 {
        smsc = Some(args.remove(1));
        args.remove(0);
    }
    if args.len() < 2 {
        eprintln!("usage: encode-pdu [--smsc <number>] <destination> <text...>");
        process::exit(2);
    }
    let destination = args.remove(0);
    let text = args.join(" ");
    let pdu = match EncodedPdu::encode(smsc.as_deref(), &destination, &text) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Failed to encode: {}", e);
            process::exit(1);
        }
    };
    println!("PDU: {:?}", pdu);
    println!("Length: {} ({} without SMSC)", pdu.len(), pdu.tpdu_len());
    let submission = send_sms_pdu(&pdu);
    println!("{}", set_sms_textmode(false));
    println!("{}", submission.length);
    // Debug-format the body so the trailing Ctrl-Z shows up as \u{1a}.
    println!("{:?}", submission.body.to_string());
}
