//! TPX3 wire-format decoding: packet tag classification, the chip-layout
//! mapper, the batch locator, the timestamp reconstructor, and the hit
//! decoder.
//!
//! This crate is pure and allocation-light; it owns no I/O. `rustpix-io`
//! supplies the raw byte region and drives these pieces across a file or
//! memory map. None of these operations can fail: a truncated region simply
//! yields fewer descriptors, and the caller (`rustpix-io`) is the one that
//! turns that into a diagnostic. This crate carries no `Error` type as a
//! result — see `DESIGN.md`.

#![forbid(unsafe_code)]

mod chip;
mod decoder;
mod locator;
mod packet;
mod reconstructor;

pub use chip::map_chip;
pub use decoder::decode_hit;
pub use locator::{scan_batches, BatchDescriptor};
pub use packet::{classify, PacketKind};
pub use reconstructor::DecoderState;
