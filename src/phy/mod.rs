//! Physical layer interpretation of PHY log rows.
//!
//! Turns simulator rows into [`LogicalPacket`](crate::pcap::LogicalPacket)s:
//! RF channel from the center frequency, PHY flags from the modulation code,
//! payload decoding with truncation recovery, and coded-PHY reassembly.

mod channel;
mod interpreter;
mod payload;

pub use channel::{rf_channel, ABSOLUTE_RANGE, OFFSET_RANGE};
pub use interpreter::{
    classify_modulation, modulation, InterpreterStats, PacketInterpreter, FEC1_SIZE,
    FEC2_MIN_SIZE,
};
pub use payload::{decode_payload, HexPayload};
