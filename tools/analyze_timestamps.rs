//! Dump the GDC/TDC timestamp stream of a raw TPX3 file in order, so the
//! reconstructor's behavior can be inspected packet by packet.
//!
//! Run with: cargo run --bin `analyze-timestamps` -- <`tpx3_file`>

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
    let mut timer_lsb32: u32 = 0;
    let mut gdc_timestamp: u64 = 0;
    let mut tdc_timestamp: u64 = 0;
    let mut gdc_publishes = 0u64;
    let mut tdc_updates = 0u64;

    for i in 0..packet_count {
        let offset = i * 8;
        let raw = u64::from_le_bytes(data[offset..offset + 8].try_into().unwrap());

        if &data[offset..offset + 3] == b"TPX" {
            current_chip = data[offset + 4];
            continue;
        }

        let byte7 = ((raw >> 56) & 0xFF) as u8;
        if byte7 == 0x6F {
            let raw_tdc = (raw >> 12) & 0xFFFF_FFFF;
            let tdc_lsb32 = gdc_timestamp & 0xFFFF_FFFF;
            let mut tdc_msb16 = (gdc_timestamp >> 32) & 0xFFFF;
            if raw_tdc < tdc_lsb32 {
                tdc_msb16 += 1;
            }
            tdc_timestamp = (tdc_msb16 << 32) | raw_tdc;
            tdc_updates += 1;
            println!("packet {i}, chip {current_chip}: TDC = {tdc_timestamp}");
            continue;
        }

        if byte7 >> 4 == 0x4 {
            let my_gdc = (raw >> 16) & 0xFFF_FFFF_FFFF;
            match (my_gdc >> 40) & 0xF {
                0x4 => timer_lsb32 = (my_gdc & 0xFFFF_FFFF) as u32,
                0x5 => {
                    let timer_msb16 = my_gdc & 0xFFFF;
                    gdc_timestamp = (timer_msb16 << 32) | u64::from(timer_lsb32);
                    gdc_publishes += 1;
                    println!("packet {i}, chip {current_chip}: GDC = {gdc_timestamp}");
                }
                _ => {}
            }
        }
    }

    println!(
        "\n{packet_count} packets scanned: {gdc_publishes} GDC publish(es), {tdc_updates} TDC update(s)"
    );
    Ok(())
}
