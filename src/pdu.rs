//! Assembly of SMS-SUBMIT PDUs (GSM 03.40), the binary form a modem expects in PDU mode.
//!
//! A submitted PDU is laid out as:
//!
//! ```text
//! [SCA len][SCA type][SCA digits...]      service center address (len 0 = modem default)
//! [first octet][message reference]
//! [DA len][DA type][DA digits...]         destination address (len counts digits)
//! [PID][DCS][VP]
//! [UDL][packed 7-bit text...]
//! ```
//!
//! `encode_pdu` writes that layout into a caller-provided buffer; `EncodedPdu` wraps it in a
//! fixed-size owned buffer and knows the length to announce in `AT+CMGS`.
use std::fmt;
use std::time::Duration;
use crate::errors::*;
use crate::gsm_encoding::{pack_text_7bit, packed_septet_len};

/// Longest message text that fits in one 7-bit SMS.
pub const MAX_TEXT_LEN: usize = 160;
/// Size of the buffer `EncodedPdu` encodes into; no single SMS-SUBMIT gets near it.
pub const MAX_PDU_LEN: usize = 256;
/// Longest phone number an address field can carry (10 octets of semi-octets).
pub const MAX_ADDRESS_DIGITS: usize = 20;
/// Terminates the PDU hex data sent after `AT+CMGS`.
pub const CTRL_Z: u8 = 0x1A;

/// International number, ISDN/telephone numbering plan.
pub const TYPE_OF_ADDRESS: u8 = AddressType::INTERNATIONAL.as_u8();
/// SMS-SUBMIT, relative validity period present.
pub const SMS_SUBMIT: u8 = PduFirstOctet::SUBMIT.as_u8();
/// Left at zero; the modem assigns the real reference.
pub const MESSAGE_REFERENCE: u8 = 0x00;
/// Plain short message.
pub const PROTOCOL_IDENTIFIER: u8 = 0x00;
/// GSM 7-bit default alphabet, no message class.
pub const DATA_CODING_SCHEME: u8 = DataCodingScheme::GSM_7BIT.as_u8();
pub const VALIDITY_PERIOD_10_DAYS: u8 = RelativeValidity::TEN_DAYS.0;

#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum TypeOfNumber {
    Unknown = 0b0_000_0000,
    International = 0b0_001_0000,
    National = 0b0_010_0000,
    Special = 0b0_011_0000,
    Gsm = 0b0_101_0000,
    Short = 0b0_110_0000,
    Reserved = 0b0_111_0000
}
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum NumberingPlanIdentification {
    NetworkDetermined = 0b0_000_0000,
    IsdnTelephone = 0b0_000_0001,
    Data = 0b0_000_0011,
    Telex = 0b0_000_0100,
    National = 0b0_000_1000,
    Private = 0b0_000_1001,
    Ermes = 0b0_000_1010
}
/// The type-of-address octet that follows an address length.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AddressType {
    pub type_of_number: TypeOfNumber,
    pub numbering_plan_identification: NumberingPlanIdentification
}
impl AddressType {
    pub const INTERNATIONAL: AddressType = AddressType {
        type_of_number: TypeOfNumber::International,
        numbering_plan_identification: NumberingPlanIdentification::IsdnTelephone
    };

    pub const fn as_u8(self) -> u8 {
        0b1_000_0000 | self.type_of_number as u8 | self.numbering_plan_identification as u8
    }
}
impl Default for AddressType {
    fn default() -> Self {
        AddressType::INTERNATIONAL
    }
}
impl From<AddressType> for u8 {
    fn from(t: AddressType) -> u8 {
        t.as_u8()
    }
}
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum MessageType {
    SmsDeliver = 0b000000_00,
    SmsSubmit = 0b000000_01,
    SmsCommand = 0b000000_10,
    Reserved = 0b000000_11
}
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum VpFieldValidity {
    NotPresent = 0b000_00_000,
    Enhanced = 0b000_01_000,
    Relative = 0b000_10_000,
    Absolute = 0b000_11_000,
}
/// First octet of an SMS-SUBMIT TPDU.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PduFirstOctet {
    mti: MessageType,
    rd: bool,
    vpf: VpFieldValidity,
    srr: bool,
    udhi: bool,
    rp: bool
}
impl PduFirstOctet {
    pub const SUBMIT: PduFirstOctet = PduFirstOctet {
        mti: MessageType::SmsSubmit,
        rd: false,
        vpf: VpFieldValidity::Relative,
        srr: false,
        udhi: false,
        rp: false
    };

    pub const fn as_u8(self) -> u8 {
        let mut ret = self.mti as u8 | self.vpf as u8;
        if self.rd {
            ret |= 0b00000100;
        }
        if self.srr {
            ret |= 0b00100000;
        }
        if self.udhi {
            ret |= 0b01000000;
        }
        if self.rp {
            ret |= 0b10000000;
        }
        ret
    }
}
impl From<PduFirstOctet> for u8 {
    fn from(o: PduFirstOctet) -> u8 {
        o.as_u8()
    }
}
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum MessageClass {
    Silent = 0b000000_00,
    StoreToNv = 0b000000_01,
    StoreToSim = 0b000000_10,
    StoreToTe = 0b000000_11
}
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum MessageEncoding {
    Gsm7Bit = 0b0000_00_00,
    EightBit = 0b0000_01_00,
    Ucs2 = 0b0000_10_00,
    Reserved = 0b0000_11_00,
}
/// General data coding group of the DCS octet (GSM 03.38 §4).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DataCodingScheme {
    pub compressed: bool,
    pub class: Option<MessageClass>,
    pub encoding: MessageEncoding
}
impl DataCodingScheme {
    pub const GSM_7BIT: DataCodingScheme = DataCodingScheme {
        compressed: false,
        class: None,
        encoding: MessageEncoding::Gsm7Bit
    };

    pub const fn as_u8(self) -> u8 {
        let mut ret = self.encoding as u8;
        if self.compressed {
            ret |= 0b0010_0000;
        }
        // Bit 4 says whether bits 0-1 carry a class.
        if let Some(class) = self.class {
            ret |= 0b0001_0000 | class as u8;
        }
        ret
    }
}
impl From<DataCodingScheme> for u8 {
    fn from(d: DataCodingScheme) -> u8 {
        d.as_u8()
    }
}
/// A validity period in the relative format (GSM 03.40 §9.2.3.12.1).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RelativeValidity(pub u8);
impl RelativeValidity {
    pub const TEN_DAYS: RelativeValidity = RelativeValidity(0xB0);

    /// How long the network keeps trying to deliver the message.
    pub fn as_duration(&self) -> Duration {
        const MINUTE: u64 = 60;
        const DAY: u64 = 24 * 60 * MINUTE;
        let v = self.0 as u64;
        let secs = match self.0 {
            0..=143 => (v + 1) * 5 * MINUTE,
            144..=167 => 12 * 60 * MINUTE + (v - 143) * 30 * MINUTE,
            168..=196 => (v - 166) * DAY,
            _ => (v - 192) * 7 * DAY
        };
        Duration::from_secs(secs)
    }
}

/// Remove a single leading `+` from a phone number, if there is one.
///
/// Numbers are always encoded as international, so the `+` carries no information.
pub fn strip_international_prefix(number: &str) -> &str {
    number.strip_prefix('+').unwrap_or(number)
}
fn check_digits(digits: &str) -> EncodeResult<()> {
    match digits.chars().enumerate().find(|&(_, c)| !c.is_ascii_digit()) {
        Some((position, character)) => Err(EncodeError::InvalidDigit { character, position }),
        None => Ok(())
    }
}
fn check_number(digits: &str) -> EncodeResult<()> {
    check_digits(digits)?;
    if digits.len() > MAX_ADDRESS_DIGITS {
        Err(EncodeError::NumberTooLong(digits.len()))?
    }
    Ok(())
}
fn semi_octet_len(digits: usize) -> usize {
    (digits + 1) / 2
}
/// Pack a string of decimal digits into swapped semi-octets, returning the bytes written.
///
/// `"1234"` becomes `[0x21, 0x43]`; an odd digit count leaves `0xF` in the last high nibble.
pub fn pack_phone_number(digits: &str, out: &mut [u8]) -> EncodeResult<usize> {
    check_digits(digits)?;
    let needed = semi_octet_len(digits.len());
    check_len!(out, needed);
    for (i, d) in digits.bytes().enumerate() {
        let d = d - b'0';
        if i % 2 == 0 {
            out[i / 2] = 0b1111_0000 | d;
        }
        else {
            out[i / 2] = (out[i / 2] & 0b0000_1111) | (d << 4);
        }
    }
    Ok(needed)
}
fn write_address(digits: &str, len: u8, out: &mut [u8]) -> EncodeResult<usize> {
    let needed = 2 + semi_octet_len(digits.len());
    check_len!(out, needed);
    out[0] = len;
    out[1] = TYPE_OF_ADDRESS;
    let packed = pack_phone_number(digits, &mut out[2..])?;
    Ok(2 + packed)
}
fn sca_field_len(service_center: Option<&str>) -> usize {
    match service_center {
        Some(sc) => 2 + semi_octet_len(sc.len()),
        None => 1
    }
}
/// Encode an SMS-SUBMIT PDU into `out`, returning its total length.
///
/// `service_center` and `destination` are bare digit strings (strip any `+` first); an absent
/// or empty service center makes the modem use its configured SMSC. `text` is packed as GSM
/// 7-bit and may be at most `MAX_TEXT_LEN` bytes long.
///
/// All inputs are validated before anything is written, so on error `out` is unchanged.
pub fn encode_pdu(service_center: Option<&str>, destination: &str, text: &str, out: &mut [u8]) -> EncodeResult<usize> {
    let service_center = service_center.filter(|sc| !sc.is_empty());
    if destination.is_empty() {
        Err(EncodeError::EmptyDestination)?
    }
    if text.len() > MAX_TEXT_LEN {
        Err(EncodeError::TextTooLong(text.len()))?
    }
    if let Some(sc) = service_center {
        check_number(sc)?;
    }
    check_number(destination)?;
    let sca_len = sca_field_len(service_center);
    let needed = sca_len + 2 + 2 + semi_octet_len(destination.len()) + 3 + 1 + packed_septet_len(text.len());
    check_len!(out, needed);

    let mut offset = match service_center {
        Some(sc) => {
            // The SCA length counts octets (type + digits), unlike the DA length.
            let octets = sca_len - 1;
            write_address(sc, octets as u8, out)?
        },
        None => {
            out[0] = 0;
            1
        }
    };
    trace!("SCA: {}", HexData(&out[..offset]));
    out[offset] = SMS_SUBMIT;
    out[offset + 1] = MESSAGE_REFERENCE;
    offset += 2;
    let start = offset;
    offset += write_address(destination, destination.len() as u8, &mut out[offset..])?;
    trace!("DA: {}", HexData(&out[start..offset]));
    out[offset] = PROTOCOL_IDENTIFIER;
    out[offset + 1] = DATA_CODING_SCHEME;
    out[offset + 2] = VALIDITY_PERIOD_10_DAYS;
    out[offset + 3] = text.len() as u8;
    offset += 4;
    offset += pack_text_7bit(text, &mut out[offset..])?;
    debug!("encoded {}-byte PDU ({} bytes of TPDU, {} septets)", offset, offset - sca_len, text.len());
    Ok(offset)
}
/// An encoded SMS-SUBMIT PDU, ready to be sent with `AT+CMGS`.
#[derive(Clone)]
pub struct EncodedPdu {
    buf: [u8; MAX_PDU_LEN],
    len: usize,
    sca_len: usize
}
impl EncodedPdu {
    /// Encode a message, accepting phone numbers with or without a leading `+`.
    pub fn encode(service_center: Option<&str>, destination: &str, text: &str) -> EncodeResult<Self> {
        let service_center = service_center
            .map(strip_international_prefix)
            .filter(|sc| !sc.is_empty());
        let destination = strip_international_prefix(destination);
        let mut buf = [0; MAX_PDU_LEN];
        let len = encode_pdu(service_center, destination, text, &mut buf)?;
        Ok(EncodedPdu {
            buf,
            len,
            sca_len: sca_field_len(service_center)
        })
    }
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }
    /// Total length, service center address included.
    pub fn len(&self) -> usize {
        self.len
    }
    /// Length of the leading service center address field.
    pub fn sca_len(&self) -> usize {
        self.sca_len
    }
    /// Length of everything after the service center address; this is what `AT+CMGS` wants.
    pub fn tpdu_len(&self) -> usize {
        self.len - self.sca_len
    }
    pub fn hex(&self) -> HexData<'_> {
        HexData(self.as_bytes())
    }
}
impl fmt::Debug for EncodedPdu {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "EncodedPdu({})", self.hex())
    }
}
/// Formats bytes as upper-case hex pairs, the way PDUs travel over the AT interface.
pub struct HexData<'a>(pub &'a [u8]);
impl<'a> fmt::Display for HexData<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for b in self.0.iter() {
            write!(f, "{:02X}", b)?;
        }
        Ok(())
    }
}
impl<'a> HexData<'a> {
    /// Write the hex form into `out` without allocating, returning the characters written.
    pub fn encode_into(&self, out: &mut [u8]) -> EncodeResult<usize> {
        const DIGITS: &[u8; 16] = b"0123456789ABCDEF";
        let needed = self.0.len() * 2;
        check_len!(out, needed);
        for (i, b) in self.0.iter().enumerate() {
            out[i * 2] = DIGITS[(b >> 4) as usize];
            out[i * 2 + 1] = DIGITS[(b & 0b0000_1111) as usize];
        }
        Ok(needed)
    }
    /// Parse pairs of hex digits (either case) back into bytes.
    pub fn decode(data: &str) -> EncodeResult<Vec<u8>> {
        if data.len() % 2 != 0 {
            Err(EncodeError::InvalidHex)?
        }
        let nibble = |c: u8| (c as char).to_digit(16).ok_or(EncodeError::InvalidHex);
        data.as_bytes()
            .chunks(2)
            .map(|pair| -> EncodeResult<u8> {
                Ok(((nibble(pair[0])? << 4) | nibble(pair[1])?) as u8)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pack(digits: &str) -> Vec<u8> {
        let mut buf = [0u8; 16];
        let len = pack_phone_number(digits, &mut buf).unwrap();
        buf[..len].to_vec()
    }

    fn encode(sc: Option<&str>, da: &str, text: &str) -> EncodeResult<Vec<u8>> {
        let mut buf = [0u8; MAX_PDU_LEN];
        let len = encode_pdu(sc, da, text, &mut buf)?;
        Ok(buf[..len].to_vec())
    }

    #[test]
    fn test_protocol_constants() {
        assert_eq!(TYPE_OF_ADDRESS, 0x91);
        assert_eq!(SMS_SUBMIT, 0x11);
        assert_eq!(DATA_CODING_SCHEME, 0x00);
        assert_eq!(VALIDITY_PERIOD_10_DAYS, 0xB0);
        assert_eq!(u8::from(AddressType::default()), 0x91);
    }

    #[test]
    fn test_header_octets() {
        let national = AddressType {
            type_of_number: TypeOfNumber::National,
            numbering_plan_identification: NumberingPlanIdentification::IsdnTelephone
        };
        assert_eq!(national.as_u8(), 0xA1);
        let flash = DataCodingScheme {
            class: Some(MessageClass::Silent),
            ..DataCodingScheme::GSM_7BIT
        };
        assert_eq!(u8::from(flash), 0x10);
        let ucs2 = DataCodingScheme {
            encoding: MessageEncoding::Ucs2,
            ..DataCodingScheme::GSM_7BIT
        };
        assert_eq!(ucs2.as_u8(), 0x08);
        let with_report = PduFirstOctet { srr: true, ..PduFirstOctet::SUBMIT };
        assert_eq!(u8::from(with_report), 0x31);
    }

    #[test]
    fn test_relative_validity() {
        let hour = 60 * 60;
        assert_eq!(RelativeValidity::TEN_DAYS.as_duration(), Duration::from_secs(10 * 24 * hour));
        assert_eq!(RelativeValidity(0).as_duration(), Duration::from_secs(5 * 60));
        assert_eq!(RelativeValidity(143).as_duration(), Duration::from_secs(12 * hour));
        assert_eq!(RelativeValidity(167).as_duration(), Duration::from_secs(24 * hour));
        assert_eq!(RelativeValidity(255).as_duration(), Duration::from_secs(63 * 7 * 24 * hour));
    }

    #[test]
    fn test_pack_even_number() {
        assert_eq!(pack("1234"), vec![0x21, 0x43]);
        assert_eq!(pack("447700900123"), vec![0x44, 0x77, 0x00, 0x09, 0x10, 0x32]);
    }

    #[test]
    fn test_pack_odd_number_is_padded() {
        assert_eq!(pack("123"), vec![0x21, 0xF3]);
        assert_eq!(pack("7"), vec![0xF7]);
    }

    #[test]
    fn test_pack_empty_number() {
        let mut buf = [0xAAu8; 2];
        assert_eq!(pack_phone_number("", &mut buf).unwrap(), 0);
        assert_eq!(buf, [0xAA; 2]);
    }

    #[test]
    fn test_pack_nibbles_swap_back() {
        let digits = "0123456789987654";
        let swapped: String = pack(digits)
            .iter()
            .flat_map(|b| vec![b & 0x0F, b >> 4])
            .map(|d| (b'0' + d) as char)
            .collect();
        assert_eq!(swapped, digits);
    }

    #[test]
    fn test_pack_length_formula() {
        let digits = "12345678901234567890";
        for n in 0..=digits.len() {
            assert_eq!(pack(&digits[..n]).len(), (n + 1) / 2);
        }
    }

    #[test]
    fn test_pack_rejects_non_digits() {
        let mut buf = [0u8; 4];
        match pack_phone_number("12a4", &mut buf) {
            Err(EncodeError::InvalidDigit { character, position }) => {
                assert_eq!(character, 'a');
                assert_eq!(position, 2);
            },
            r => panic!("unexpected result: {:?}", r)
        }
        assert!(pack_phone_number("+4477", &mut buf).unwrap_err().is_invalid_digit());
        assert!(pack_phone_number("12 34", &mut buf).unwrap_err().is_invalid_digit());
        assert_eq!(buf, [0; 4]);
    }

    #[test]
    fn test_pack_buffer_one_short() {
        let mut buf = [0u8; 2];
        assert!(pack_phone_number("12345", &mut buf).unwrap_err().is_buffer_too_small());
        assert_eq!(buf, [0; 2]);
    }

    #[test]
    fn test_strip_international_prefix() {
        assert_eq!(strip_international_prefix("+447700900123"), "447700900123");
        assert_eq!(strip_international_prefix("447700900123"), "447700900123");
        assert_eq!(strip_international_prefix("++1"), "+1");
    }

    #[test]
    fn test_encode_without_service_center() {
        let pdu = encode(None, "15551234567", "hi").unwrap();
        assert_eq!(pdu, vec![
            0x00,
            0x11, 0x00,
            0x0B, 0x91, 0x51, 0x55, 0x21, 0x43, 0x65, 0xF7,
            0x00, 0x00, 0xB0,
            0x02, 0xE8, 0x34
        ]);
        assert_eq!(encode(Some(""), "15551234567", "hi").unwrap(), pdu);
    }

    #[test]
    fn test_encode_service_center_length_counts_octets() {
        let pdu = encode(Some("447700900123"), "123", "").unwrap();
        assert_eq!(&pdu[..8], &[0x07, 0x91, 0x44, 0x77, 0x00, 0x09, 0x10, 0x32][..]);
        assert_eq!(&pdu[8..], &[0x11, 0x00, 0x03, 0x91, 0x21, 0xF3, 0x00, 0x00, 0xB0, 0x00][..]);
    }

    #[test]
    fn test_encode_text_length_boundary() {
        let text = "x".repeat(MAX_TEXT_LEN);
        let pdu = encode(None, "15551234567", &text).unwrap();
        assert_eq!(pdu.len(), 1 + 2 + 8 + 3 + 1 + 140);
        assert_eq!(pdu[14], 160);
        let text = "x".repeat(MAX_TEXT_LEN + 1);
        match encode(None, "15551234567", &text) {
            Err(EncodeError::TextTooLong(161)) => {},
            r => panic!("unexpected result: {:?}", r)
        }
    }

    #[test]
    fn test_encode_rejects_bad_numbers() {
        assert!(encode(None, "", "hi").unwrap_err().is_empty_destination());
        assert!(encode(None, "+15551234567", "hi").unwrap_err().is_invalid_digit());
        assert!(encode(Some("1555x"), "15551234567", "hi").unwrap_err().is_invalid_digit());
        let long = "1".repeat(MAX_ADDRESS_DIGITS + 1);
        assert!(encode(None, &long, "hi").unwrap_err().is_number_too_long());
        assert!(encode(None, &long[1..], "hi").is_ok());
    }

    #[test]
    fn test_encode_buffer_one_short_leaves_buffer_alone() {
        let needed = encode(Some("15551234567"), "15557654321", "Test").unwrap().len();
        let mut buf = vec![0xEEu8; needed - 1];
        match encode_pdu(Some("15551234567"), "15557654321", "Test", &mut buf) {
            Err(EncodeError::BufferTooSmall { needed: n, available }) => {
                assert_eq!(n, needed);
                assert_eq!(available, needed - 1);
            },
            r => panic!("unexpected result: {:?}", r)
        }
        assert!(buf.iter().all(|&b| b == 0xEE));
    }

    #[test]
    fn test_encoded_pdu_lengths() {
        let pdu = EncodedPdu::encode(Some("+15551234567"), "+15557654321", "Test").unwrap();
        assert_eq!(pdu.len(), 26);
        assert_eq!(pdu.sca_len(), 8);
        assert_eq!(pdu.tpdu_len(), 18);
        let pdu = EncodedPdu::encode(Some("+"), "15557654321", "Test").unwrap();
        assert_eq!(pdu.sca_len(), 1);
        assert_eq!(pdu.tpdu_len(), pdu.len() - 1);
        assert_eq!(pdu.as_bytes()[0], 0);
    }

    #[test]
    fn test_hex_data() {
        let data: [u8; 5] = [0x07, 0x91, 0xAB, 0x00, 0x1A];
        assert_eq!(HexData(&data).to_string(), "0791AB001A");
        let mut out = [0u8; 10];
        assert_eq!(HexData(&data).encode_into(&mut out).unwrap(), 10);
        assert_eq!(&out, b"0791AB001A");
        assert!(HexData(&data).encode_into(&mut out[..9]).unwrap_err().is_buffer_too_small());
        assert_eq!(HexData::decode("0791ab001A").unwrap(), data.to_vec());
        assert!(HexData::decode("079").unwrap_err().is_invalid_hex());
        assert!(HexData::decode("07ZZ").unwrap_err().is_invalid_hex());
        assert!(HexData::decode("+1").unwrap_err().is_invalid_hex());
        assert!(HexData::decode("+F+F").unwrap_err().is_invalid_hex());
        assert!(HexData::decode("-1").unwrap_err().is_invalid_hex());
        assert!(HexData::decode("\u{e9}").unwrap_err().is_invalid_hex());
    }
}
