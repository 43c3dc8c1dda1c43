//! Packing of message text into the GSM 7-bit user data stream (GSM 03.38 / 03.40).
//!
//! Each character is a *septet*: only its low 7 bits are transmitted, and eight septets fit
//! in seven octets. The packer does not transcode; text is expected to already be in the GSM
//! default alphabet (plain ASCII letters, digits and most punctuation coincide with it).
//! Bytes with the eighth bit set are masked to their low 7 bits, which keeps the encoder from
//! failing on odd input at the cost of garbling those characters.

use crate::errors::*;

/// Number of octets needed to hold `septets` packed 7-bit characters.
pub fn packed_septet_len(septets: usize) -> usize {
    (septets * 7 + 7) / 8
}

/// Pack `text` into `out` as GSM 7-bit septets, returning the number of octets written.
///
/// Every byte of `text` counts as one septet. `out` must hold at least
/// `packed_septet_len(text.len())` bytes; if it doesn't, nothing is written.
pub fn pack_text_7bit(text: &str, out: &mut [u8]) -> EncodeResult<usize> {
    let orig = text.as_bytes();
    let needed = packed_septet_len(orig.len());
    check_len!(out, needed);
    if orig.iter().any(|b| b & 0b1000_0000 != 0) {
        warn!("message text contains non-7-bit bytes; masking them");
    }
    // Number of low bits of the current septet already carried by the previous octet.
    let mut shift: u32 = 0;
    let mut i = 0;
    let mut written = 0;
    while i < orig.len() {
        let mut cur = (orig[i] & 0b0111_1111) >> shift;
        if let Some(next) = orig.get(i + 1) {
            cur |= (next & 0b0111_1111) << (7 - shift);
        }
        out[written] = cur;
        written += 1;
        shift += 1;
        i += 1;
        if shift == 7 {
            // The septet after a full cycle was folded entirely into the octet above.
            shift = 0;
            i += 1;
        }
    }
    debug_assert_eq!(written, needed);
    Ok(written)
}
