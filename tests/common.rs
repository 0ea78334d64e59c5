use thrpatch::ydl::{MAGIC, NAME_SIZE, RECORD_OFFSET, RECORD_SIZE, RECORD_STRIDE};

/// Builds a YDL buffer from whole records, each followed by its 5-byte gap.
pub fn ydl_bytes(records: &[[u8; RECORD_SIZE]]) -> Vec<u8> {
    let mut data = MAGIC.to_vec();
    data.resize(RECORD_OFFSET, 0);
    for record in records {
        data.extend_from_slice(record);
        data.extend_from_slice(&[0xEE; RECORD_STRIDE - RECORD_SIZE]);
    }
    data
}

/// A record with `name` zero-padded to the name area and `fill` elsewhere.
pub fn named_record(name: &str, fill: u8) -> [u8; RECORD_SIZE] {
    assert!(name.len() <= NAME_SIZE);
    let mut record = [fill; RECORD_SIZE];
    record[..NAME_SIZE].fill(0);
    record[..name.len()].copy_from_slice(name.as_bytes());
    record
}

/// Sum of `bytes` modulo 128
#[allow(dead_code)]
pub fn sum7(bytes: &[u8]) -> u32 {
    bytes.iter().map(|&b| b as u32).sum::<u32>() % 128
}
