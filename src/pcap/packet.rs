//! Logical packet representation.

/// Length of the LE LL pseudo-header that precedes every record's data.
pub const PHY_HEADER_LEN: usize = 10;

/// Length of the access address field following the pseudo-header.
pub const ACCESS_ADDRESS_LEN: usize = 4;

/// Fixed bytes in front of the PDU in every record.
pub const RECORD_PREFIX_LEN: usize = PHY_HEADER_LEN + ACCESS_ADDRESS_LEN;

/// Bit definitions for the pseudo-header `flags` field.
pub mod flags {
    /// Signal power field holds a valid value.
    pub const SIGNAL_POWER_VALID: u16 = 1 << 1;

    /// Mask of the PHY selector (bits 15:14).
    pub const PHY_MASK: u16 = 0b11 << 14;
    pub const PHY_1M: u16 = 0b00 << 14;
    pub const PHY_2M: u16 = 0b01 << 14;
    pub const PHY_CODED: u16 = 0b10 << 14;
}

/// Physical layer a packet was sent on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phy {
    /// Uncoded 1 Mb/s
    #[default]
    Le1M,
    /// Uncoded 2 Mb/s
    Le2M,
    /// Coded (FEC) PHY
    LeCoded,
}

impl Phy {
    /// Value of the PHY selector bits in the flags field.
    pub fn flag_bits(self) -> u16 {
        match self {
            Phy::Le1M => flags::PHY_1M,
            Phy::Le2M => flags::PHY_2M,
            Phy::LeCoded => flags::PHY_CODED,
        }
    }
}

/// One on-air transmission ready to be written as a capture record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalPacket {
    /// Absolute timestamp in microseconds.
    pub timestamp_us: u64,

    /// BLE RF channel index (0..=39).
    pub rf_channel: u8,

    /// Signal power in dBm.
    pub signal_power: i8,

    /// Pseudo-header flags.
    pub flags: u16,

    /// Access address.
    pub access_address: u32,

    /// PDU and CRC bytes.
    pub payload: Vec<u8>,

    /// Length on the air, including the pseudo-header and access address.
    /// Zero when the log captured nothing.
    pub declared_length: u32,
}

impl LogicalPacket {
    /// Bytes actually stored for this packet under the given snap length.
    pub fn captured_length(&self, snaplen: u32) -> u32 {
        self.declared_length.min(snaplen)
    }

    /// Check if the record will be cut short by the snap length.
    pub fn is_truncated(&self, snaplen: u32) -> bool {
        self.captured_length(snaplen) < self.declared_length
    }

    /// PHY encoded in the flags field.
    pub fn phy(&self) -> Phy {
        match self.flags & flags::PHY_MASK {
            flags::PHY_2M => Phy::Le2M,
            flags::PHY_CODED => Phy::LeCoded,
            _ => Phy::Le1M,
        }
    }
}
