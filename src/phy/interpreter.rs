//! Row interpretation and coded-PHY reassembly.
//!
//! Uncoded rows map one-to-one onto packets. A coded transmission is logged as
//! two rows from the same device: FEC1, which carries only the coding
//! indicator byte, followed by FEC2 with the PDU and CRC. The pair becomes a
//! single packet; an FEC1 whose follower does not qualify is dropped.

use crate::error::Error;
use crate::io::{LogRow, RowSource};
use crate::merge::MergeSelector;
use crate::pcap::{flags, LogicalPacket, Phy, RECORD_PREFIX_LEN};

use super::channel::rf_channel;
use super::payload::decode_payload;

/// Simulator modulation codes.
pub mod modulation {
    pub const BLE_1M: u32 = 0x10;
    pub const BLE_2M: u32 = 0x20;
    pub const BLE_CODED: u32 = 0x30;
}

/// Declared size of an FEC1 row (the coding indicator).
pub const FEC1_SIZE: usize = 1;

/// Smallest FEC2 payload: 2-byte PDU header plus 3-byte CRC.
pub const FEC2_MIN_SIZE: usize = 5;

/// Map a modulation code onto a PHY, if it is one we know.
pub fn classify_modulation(code: u32) -> Option<Phy> {
    match code {
        modulation::BLE_1M => Some(Phy::Le1M),
        modulation::BLE_2M => Some(Phy::Le2M),
        modulation::BLE_CODED => Some(Phy::LeCoded),
        _ => None,
    }
}

fn is_fec2(row: &LogRow) -> bool {
    row.modulation == modulation::BLE_CODED && row.packet_size >= FEC2_MIN_SIZE
}

fn is_fec1(row: &LogRow) -> bool {
    row.modulation == modulation::BLE_CODED && row.packet_size == FEC1_SIZE
}

/// Counters describing what the interpreter did with its input.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct InterpreterStats {
    /// Rows whose payload was shorter than declared or malformed.
    pub truncated_rows: u64,
    /// FEC1 rows dropped for lack of a qualifying FEC2.
    pub fec1_dropped: u64,
    /// FEC1/FEC2 pairs merged into one packet.
    pub coded_reassembled: u64,
    /// Rows with a modulation code outside the known set.
    pub unknown_modulation: u64,
}

/// Turns merged rows into logical packets.
#[derive(Debug)]
pub struct PacketInterpreter {
    base_time_us: u64,
    stats: InterpreterStats,
}

impl PacketInterpreter {
    pub fn new(base_time_us: u64) -> Self {
        Self {
            base_time_us,
            stats: InterpreterStats::default(),
        }
    }

    pub fn stats(&self) -> InterpreterStats {
        self.stats
    }

    /// Interpret a row taken from `source`.
    ///
    /// For an FEC1 row the next row of the same source is examined and, if it
    /// is a qualifying FEC2, consumed from `merge`. Returns `Ok(None)` when the
    /// row produces no packet.
    pub fn interpret<S: RowSource>(
        &mut self,
        row: LogRow,
        source: usize,
        merge: &mut MergeSelector<S>,
    ) -> Result<Option<LogicalPacket>, Error> {
        let channel = rf_channel(row.center_freq, row.start_time)?;

        let phy = classify_modulation(row.modulation).unwrap_or_else(|| {
            tracing::debug!(
                source = merge.source_name(source),
                start_time = row.start_time,
                modulation = row.modulation,
                "unknown modulation, flagging as 1M"
            );
            self.stats.unknown_modulation += 1;
            Phy::Le1M
        });

        let (payload, declared_length) = if is_fec1(&row) {
            let fec2 = if merge.peek(source).is_some_and(is_fec2) {
                merge.take(source)?
            } else {
                None
            };
            let Some(fec2) = fec2 else {
                tracing::debug!(
                    source = merge.source_name(source),
                    start_time = row.start_time,
                    "coded packet without FEC2, dropping"
                );
                self.stats.fec1_dropped += 1;
                return Ok(None);
            };
            rf_channel(fec2.center_freq, fec2.start_time)?;

            let mut payload = self.payload(&row, merge.source_name(source));
            let fec2_payload = self.payload(&fec2, merge.source_name(source));
            // FEC2's on-air length plus the folded-in coding indicator.
            let declared = on_air_length(fec2_payload.len()) + payload.len() as u32;
            payload.extend_from_slice(&fec2_payload);
            self.stats.coded_reassembled += 1;
            (payload, declared)
        } else if row.packet_size == 0 {
            (Vec::new(), 0)
        } else {
            let payload = self.payload(&row, merge.source_name(source));
            let declared = on_air_length(payload.len());
            (payload, declared)
        };

        Ok(Some(LogicalPacket {
            timestamp_us: self.base_time_us.saturating_add(row.start_time),
            rf_channel: channel,
            signal_power: row.power_level.trunc() as i8,
            flags: phy.flag_bits() | flags::SIGNAL_POWER_VALID,
            access_address: row.phy_address as u32,
            payload,
            declared_length,
        }))
    }

    /// Decode a row's payload, recovering from truncation.
    fn payload(&mut self, row: &LogRow, source_name: &str) -> Vec<u8> {
        let decoded = decode_payload(&row.packet, row.packet_size);
        if decoded.is_truncated() {
            tracing::warn!(
                source = source_name,
                start_time = row.start_time,
                declared = row.packet_size,
                available = decoded.bytes().len(),
                "truncated packet in log, keeping the bytes available"
            );
            self.stats.truncated_rows += 1;
        }
        decoded.into_bytes()
    }
}

fn on_air_length(payload_len: usize) -> u32 {
    u32::try_from(payload_len + RECORD_PREFIX_LEN).unwrap_or(u32::MAX)
}
