//! PCAP file writing module.
//!
//! This module turns reassembled radio transmissions into records of a
//! Bluetooth LE capture file.

mod packet;
mod writer;

pub use packet::{
    flags, LogicalPacket, Phy, ACCESS_ADDRESS_LEN, PHY_HEADER_LEN, RECORD_PREFIX_LEN,
};
pub use writer::{
    encode_record, file_header, PcapWriter, DEFAULT_SNAPLEN, FILE_HEADER_LEN,
    LINKTYPE_BLUETOOTH_LE_LL_WITH_PHDR, PCAP_MAGIC, RECORD_HEADER_LEN, VERSION_MAJOR,
    VERSION_MINOR,
};
