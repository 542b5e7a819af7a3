//! Walk a raw TPX3 file looking for TDC rollover: a trigger timestamp that
//! drops sharply instead of advancing, the 32-bit counter wrapping around.
//!
//! Run with: cargo run --bin `analyze-rollover` -- <`tpx3_file`>

use std::env;
use std::fs::File;
use std::io::Read;

fn main() -> std::io::Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <tpx3_file>", args[0]);
        std::process::exit(1);
    }

    let mut file = File::open(&args[1])?;
    let mut data = Vec::new();
    file.read_to_end(&mut data)?;

    let packet_count = data.len() / 8;
    let mut current_chip: u8 = 0;
    let mut last_tdc: Option<u32> = None;
    let mut tdc_events: Vec<(usize, u8, u32)> = Vec::new();
    let mut rollovers = 0u32;

    for i in 0..packet_count {
        let offset = i * 8;
        let raw = u64::from_le_bytes(data[offset..offset + 8].try_into().unwrap());

        if &data[offset..offset + 3] == b"TPX" {
            current_chip = data[offset + 4];
            continue;
        }

        let byte7 = ((raw >> 56) & 0xFF) as u8;
        if byte7 == 0x6F {
            let raw_tdc = ((raw >> 12) & 0xFFFF_FFFF) as u32;

            if let Some(last) = last_tdc {
                if raw_tdc < last && (last - raw_tdc) > 500_000_000 {
                    rollovers += 1;
                    println!("=== TDC ROLLOVER #{rollovers} ===");
                    println!("packet {i}, chip {current_chip}: {last} -> {raw_tdc}");
                    println!("recent TDCs:");
                    for (idx, chip, ts) in tdc_events.iter().rev().take(5).rev() {
                        println!("  packet {idx}, chip {chip}: {ts}");
                    }
                }
            }

            tdc_events.push((i, current_chip, raw_tdc));
            if tdc_events.len() > 64 {
                tdc_events.remove(0);
            }
            last_tdc = Some(raw_tdc);
        }
    }

    println!("\n{packet_count} packets scanned, {rollovers} rollover(s) found");
    Ok(())
}
