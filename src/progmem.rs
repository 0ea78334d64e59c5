//! C source dump of a preset file, for compiling patches into AVR flash.

use crate::ydl::{Container, RECORD_OFFSET, RECORD_STRIDE};

/// Most patches a firmware image takes
pub const MAX_PROGMEM_PATCHES: usize = 100;

/// Number of leading container bytes covering `num_patches` records.
pub fn dump_len(container: &Container, num_patches: usize) -> usize {
    let wanted = RECORD_OFFSET + RECORD_STRIDE * num_patches.min(MAX_PROGMEM_PATCHES);
    wanted.min(container.as_bytes().len())
}

/// Formats the head of the container as a `PROGMEM` byte array, one byte per
/// line. Returns an empty string if there is nothing to dump.
pub fn format_progmem(container: &Container, num_patches: usize) -> String {
    let bytes = &container.as_bytes()[..dump_len(container, num_patches)];
    if bytes.is_empty() {
        return String::new();
    }

    let mut ret = String::with_capacity(bytes.len() * 7 + 48);
    ret.push_str("const uint8_t patches[] PROGMEM = {\n");
    for b in bytes {
        ret.push_str(&format!("0x{:02x}, \n", b));
    }
    ret.push_str("};\n");

    ret
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ydl::MAGIC;

    fn container(records: usize) -> Container {
        let mut data = MAGIC.to_vec();
        data.resize(RECORD_OFFSET + records * RECORD_STRIDE, 0xAB);
        Container::load(data).unwrap()
    }

    #[test]
    fn test_dump_len() {
        let c = container(3);
        assert_eq!(dump_len(&c, 0), RECORD_OFFSET);
        assert_eq!(dump_len(&c, 1), RECORD_OFFSET + RECORD_STRIDE);
        assert_eq!(dump_len(&c, 3), RECORD_OFFSET + 3 * RECORD_STRIDE);
        assert_eq!(dump_len(&c, 50), c.as_bytes().len());
    }

    #[test]
    fn test_dump_len_capped() {
        let c = container(MAX_PROGMEM_PATCHES + 5);
        assert_eq!(
            dump_len(&c, usize::MAX),
            RECORD_OFFSET + MAX_PROGMEM_PATCHES * RECORD_STRIDE
        );
    }

    #[test]
    fn test_format() {
        let c = container(1);
        let text = format_progmem(&c, 1);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "const uint8_t patches[] PROGMEM = {");
        assert_eq!(lines[1], "0x44, ");
        assert_eq!(lines[7], "0x64, ");
        assert_eq!(lines[8], "0xab, ");
        assert_eq!(lines.len(), 1 + RECORD_OFFSET + RECORD_STRIDE + 1);
        assert_eq!(*lines.last().unwrap(), "};");
    }

    #[test]
    fn test_format_header_only() {
        let c = Container::load(MAGIC.to_vec()).unwrap();
        let text = format_progmem(&c, 10);
        assert_eq!(text.lines().count(), 1 + MAGIC.len() + 1);
    }
}
