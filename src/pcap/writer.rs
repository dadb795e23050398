//! PCAP file writer.
//!
//! Writes classic (microsecond) little-endian pcap with link type
//! `LINKTYPE_BLUETOOTH_LE_LL_WITH_PHDR`. Each record's data is the 10-byte
//! LE LL pseudo-header, the access address, then the PDU and CRC.

use std::io::{self, Write};

use super::packet::{LogicalPacket, RECORD_PREFIX_LEN};

/// PCAP magic, microsecond resolution.
pub const PCAP_MAGIC: u32 = 0xa1b2_c3d4;

/// PCAP format version.
pub const VERSION_MAJOR: u16 = 2;
pub const VERSION_MINOR: u16 = 4;

/// Bluetooth LE link layer with pseudo-header.
pub const LINKTYPE_BLUETOOTH_LE_LL_WITH_PHDR: u32 = 256;

/// Snap length used when none is configured.
pub const DEFAULT_SNAPLEN: u32 = 512;

/// Size of the global file header.
pub const FILE_HEADER_LEN: usize = 24;

/// Size of each record header.
pub const RECORD_HEADER_LEN: usize = 16;

/// Writer for BLE capture files.
pub struct PcapWriter<W: Write> {
    inner: W,
    snaplen: u32,
    buf: Vec<u8>,
    records: u64,
}

impl<W: Write> PcapWriter<W> {
    /// Write the file header and return a writer ready for records.
    pub fn new(mut inner: W, snaplen: u32) -> io::Result<Self> {
        inner.write_all(&file_header(snaplen))?;

        Ok(Self {
            inner,
            snaplen,
            buf: Vec::with_capacity(RECORD_HEADER_LEN + snaplen.min(u16::MAX as u32) as usize),
            records: 0,
        })
    }

    /// Configured snap length.
    pub fn snaplen(&self) -> u32 {
        self.snaplen
    }

    /// Number of records written so far.
    pub fn record_count(&self) -> u64 {
        self.records
    }

    /// Append one record.
    ///
    /// The record header and data are assembled first and handed to the sink
    /// in a single `write_all`.
    pub fn write_packet(&mut self, packet: &LogicalPacket) -> io::Result<()> {
        self.buf.clear();
        encode_record(packet, self.snaplen, &mut self.buf);
        self.inner.write_all(&self.buf)?;
        self.records += 1;
        Ok(())
    }

    /// Flush the sink and return it.
    pub fn finish(mut self) -> io::Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

/// Encode the 24-byte global header.
pub fn file_header(snaplen: u32) -> [u8; FILE_HEADER_LEN] {
    let mut header = [0u8; FILE_HEADER_LEN];
    header[0..4].copy_from_slice(&PCAP_MAGIC.to_le_bytes());
    header[4..6].copy_from_slice(&VERSION_MAJOR.to_le_bytes());
    header[6..8].copy_from_slice(&VERSION_MINOR.to_le_bytes());
    // thiszone (i32) and sigfigs (u32) stay zero
    header[16..20].copy_from_slice(&snaplen.to_le_bytes());
    header[20..24].copy_from_slice(&LINKTYPE_BLUETOOTH_LE_LL_WITH_PHDR.to_le_bytes());
    header
}

/// Append one encoded record (header + captured data) to `out`.
pub fn encode_record(packet: &LogicalPacket, snaplen: u32, out: &mut Vec<u8>) {
    let incl_len = packet.captured_length(snaplen);
    let ts_sec = (packet.timestamp_us / 1_000_000) as u32;
    let ts_usec = (packet.timestamp_us % 1_000_000) as u32;

    out.extend_from_slice(&ts_sec.to_le_bytes());
    out.extend_from_slice(&ts_usec.to_le_bytes());
    out.extend_from_slice(&incl_len.to_le_bytes());
    out.extend_from_slice(&packet.declared_length.to_le_bytes());

    let start = out.len();

    // LE LL pseudo-header
    out.push(packet.rf_channel);
    out.push(packet.signal_power as u8);
    out.push(0); // noise power
    out.push(0); // access address offenses
    out.extend_from_slice(&0u32.to_le_bytes()); // reference access address
    out.extend_from_slice(&packet.flags.to_le_bytes());

    out.extend_from_slice(&packet.access_address.to_le_bytes());

    let room = (incl_len as usize).saturating_sub(RECORD_PREFIX_LEN);
    let take = room.min(packet.payload.len());
    out.extend_from_slice(&packet.payload[..take]);

    // Exactly incl_len data bytes, even when the snap length cuts into the prefix.
    out.resize(start + incl_len as usize, 0);
}
