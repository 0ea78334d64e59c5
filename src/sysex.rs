use log::debug;

use crate::error::ValueError;
use crate::ydl::{PatchRecord, RECORD_SIZE};

/// THR SysEx constants
pub const SYSEX_START: u8 = 0xF0;
pub const SYSEX_END: u8 = 0xF7;
pub const YAMAHA_ID: u8 = 0x43;
const DEVICE_NUMBER: u8 = 0x7D;

/// Start of exclusive, manufacturer, device number, reserved
pub const MESSAGE_START: [u8; 4] = [SYSEX_START, YAMAHA_ID, DEVICE_NUMBER, 0x00];

/// Patch type identifier heading the data section (same for all patches)
pub const PATCH_MAGIC: &[u8; 12] = b"DTA1AllP\x00\x00\x7f\x7f";

/// Start marker + two length bytes
pub const HEADER_SIZE: usize = MESSAGE_START.len() + 2;

/// Patch magic + patch record
pub const DATA_SIZE: usize = 0x10C;

/// Checksum + end marker
pub const TRAILER_SIZE: usize = 2;

/// Total size of one patch message
pub const SYSEX_SIZE: usize = HEADER_SIZE + DATA_SIZE + TRAILER_SIZE;

const PATCH_OFFSET: usize = HEADER_SIZE + PATCH_MAGIC.len();
const CHECKSUM_OFFSET: usize = HEADER_SIZE + DATA_SIZE;

const _: () = assert!(PATCH_MAGIC.len() + RECORD_SIZE == DATA_SIZE);

/// A complete single-patch dump, ready for a MIDI port or a .syx file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SysexMessage([u8; SYSEX_SIZE]);

impl SysexMessage {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Patch magic and patch bytes, as covered by the checksum
    pub fn data(&self) -> &[u8] {
        &self.0[HEADER_SIZE..CHECKSUM_OFFSET]
    }

    /// The patch bytes as sent, last byte cleared
    pub fn patch(&self) -> &[u8] {
        &self.0[PATCH_OFFSET..CHECKSUM_OFFSET]
    }

    pub fn checksum(&self) -> u8 {
        self.0[CHECKSUM_OFFSET]
    }

    /// Checks framing, declared length and checksum.
    pub fn verify(&self) -> bool {
        self.0[..MESSAGE_START.len()] == MESSAGE_START
            && self.0[4..HEADER_SIZE] == length_bytes(DATA_SIZE)
            && self.0[SYSEX_SIZE - 1] == SYSEX_END
            && self.checksum() == checksum(self.data())
    }
}

impl AsRef<[u8]> for SysexMessage {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// Splits a 14-bit length over two 7-bit data bytes, high bits first.
fn length_bytes(len: usize) -> [u8; 2] {
    [((len >> 7) & 0x7F) as u8, (len & 0x7F) as u8]
}

/// Yamaha checksum: the 7-bit value that makes `data` sum to 0 mod 128.
pub fn checksum(data: &[u8]) -> u8 {
    let sum = data.iter().fold(0i32, |sum, &b| sum.wrapping_add(b as i32));
    (sum.wrapping_neg() & 0x7F) as u8
}

/// Wraps a patch record into a THR patch dump message.
pub fn build(record: &PatchRecord) -> SysexMessage {
    let mut msg = [0u8; SYSEX_SIZE];

    // Header
    msg[..MESSAGE_START.len()].copy_from_slice(&MESSAGE_START);
    msg[MESSAGE_START.len()..HEADER_SIZE].copy_from_slice(&length_bytes(DATA_SIZE));

    // Data section
    msg[HEADER_SIZE..PATCH_OFFSET].copy_from_slice(PATCH_MAGIC);
    msg[PATCH_OFFSET..CHECKSUM_OFFSET].copy_from_slice(record.as_bytes());
    // The amp expects the last patch byte to be zero.
    msg[CHECKSUM_OFFSET - 1] = 0;

    msg[CHECKSUM_OFFSET] = checksum(&msg[HEADER_SIZE..CHECKSUM_OFFSET]);
    msg[CHECKSUM_OFFSET + 1] = SYSEX_END;

    debug!("SYSEX: assembled {} bytes, checksum 0x{:02X}", SYSEX_SIZE, msg[CHECKSUM_OFFSET]);

    SysexMessage(msg)
}

/// Like [`build`], for patch data that has not been length-checked yet.
pub fn build_from_bytes(data: &[u8]) -> Result<SysexMessage, ValueError> {
    let record = PatchRecord::try_from(data)?;
    Ok(build(&record))
}
