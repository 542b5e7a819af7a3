//! Hit decoder (C5): turns one pixel-data packet into a [`Hit`], resolving
//! spider-time against the current GDC anchor and computing time-of-flight
//! against the current TDC.

use rustpix_core::Hit;

use crate::chip::map_chip;
use crate::reconstructor::DecoderState;

/// One pulse period at 60 Hz, in 25 ns ticks (≈16.667 ms). Used both to
/// wrap a negative `tof` and to unwrap the 30-bit anomaly below.
const PULSE_PERIOD_TICKS: u32 = 666_667;

/// The 30-bit correction applied when an unwrapped `tof` exceeds one pulse
/// period.
const ANOMALY_UNWRAP: u32 = 1 << 30;

/// Decodes one 8-byte pixel-data word into a [`Hit`], given the decoder
/// state observed at this point in the stream and the batch's chip id.
///
/// `word` is interpreted as eight little-endian bytes, per the bit layout
/// in the data model: `spider_time16` from bytes 0..2, `ftoa`/`tot` packed
/// into byte 2 and the low nibble of byte 3, `toa` and the pixel address
/// spanning bytes 3..8.
#[must_use]
pub fn decode_hit(word: u64, state: &DecoderState, chip_id: u8) -> Hit {
    let bytes = word.to_le_bytes();

    let spider_time16 = u16::from_le_bytes([bytes[0], bytes[1]]);
    let ftoa = bytes[2] & 0xF;

    let w24 = u32::from_le_bytes([bytes[2], bytes[3], 0, 0]);
    let tot = ((w24 >> 4) & 0x3FF) as u16;

    let w47 = u32::from_le_bytes([bytes[3], bytes[4], bytes[5], bytes[6]]);
    let toa = ((w47 >> 6) & 0x3FFF) as u16;

    let w48 = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    let pixaddr = ((w48 >> 12) & 0xFFFF) as u16;

    let dcol = (pixaddr & 0xFE00) >> 8;
    let spix = (pixaddr & 0x1F8) >> 1;
    let pix = pixaddr & 0x7;

    let x_local = dcol + (pix >> 2);
    let y_local = spix + (pix & 0x3);
    let (x, y) = map_chip(chip_id, x_local, y_local);

    let spidertime32 = (u32::from(spider_time16) << 14) | u32::from(toa);

    let spdr_lsb30 = state.gdc_timestamp & 0x3FFF_FFFF;
    let mut spdr_msb18 = (state.gdc_timestamp >> 30) & 0x3_FFFF;
    if u64::from(spidertime32) < spdr_lsb30 {
        spdr_msb18 += 1;
    }
    let spidertime48 = ((spdr_msb18 << 30) & 0xFFFF_C000_0000) | u64::from(spidertime32);

    // Narrowed to u32 here, before the anomaly check, matching the
    // original's 32-bit `m_tof` member: the TDC can be stale by more than
    // u32::MAX ticks (TDC packets don't always arrive before the data
    // packets they time), and both the pulse-period compare and the
    // anomaly correction below are meant to run on the truncated value.
    let raw_tof = if spidertime48 < state.tdc_timestamp {
        spidertime48
            .wrapping_sub(state.tdc_timestamp)
            .wrapping_add(u64::from(PULSE_PERIOD_TICKS))
    } else {
        spidertime48 - state.tdc_timestamp
    };
    let mut tof = raw_tof as u32;
    if tof > PULSE_PERIOD_TICKS {
        tof = tof.wrapping_sub(ANOMALY_UNWRAP);
    }

    Hit::new(x, y, tot, toa, ftoa, tof, spidertime48)
}
