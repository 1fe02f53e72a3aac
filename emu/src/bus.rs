//! # Memory bus
//!
//! The CPU core never owns memory, it only issues byte, halfword and word
//! requests through [`Bus`]. Implementors provide the byte accesses;
//! halfwords and words are assembled little-endian from successive bytes.
//! Accesses always succeed: what an unmapped address returns is up to the
//! implementor.

pub trait Bus {
    fn read8(&self, address: u32) -> u8;

    fn write8(&mut self, address: u32, value: u8);

    fn read16(&self, address: u32) -> u16 {
        u16::from_le_bytes([self.read8(address), self.read8(address.wrapping_add(1))])
    }

    fn read32(&self, address: u32) -> u32 {
        u32::from_le_bytes([
            self.read8(address),
            self.read8(address.wrapping_add(1)),
            self.read8(address.wrapping_add(2)),
            self.read8(address.wrapping_add(3)),
        ])
    }

    fn write16(&mut self, address: u32, value: u16) {
        for (offset, byte) in (0..).zip(value.to_le_bytes()) {
            self.write8(address.wrapping_add(offset), byte);
        }
    }

    fn write32(&mut self, address: u32, value: u32) {
        for (offset, byte) in (0..).zip(value.to_le_bytes()) {
            self.write8(address.wrapping_add(offset), byte);
        }
    }
}

/// Flat memory starting at address 0.
/// Reads past the end return 0 and writes past the end are dropped.
#[derive(Debug, Default, Clone)]
pub struct Ram {
    bytes: Vec<u8>,
}

impl Ram {
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            bytes: vec![0; size],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl From<Vec<u8>> for Ram {
    fn from(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

impl Bus for Ram {
    fn read8(&self, address: u32) -> u8 {
        usize::try_from(address)
            .ok()
            .and_then(|idx| self.bytes.get(idx).copied())
            .unwrap_or_else(|| {
                tracing::debug!("read from unmapped address 0x{address:08X}");
                0
            })
    }

    fn write8(&mut self, address: u32, value: u8) {
        match usize::try_from(address)
            .ok()
            .and_then(|idx| self.bytes.get_mut(idx))
        {
            Some(byte) => *byte = value,
            None => tracing::debug!("write to unmapped address 0x{address:08X} dropped"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn check_word_is_little_endian() {
        let mut ram = Ram::new(16);
        ram.write32(4, 0x1234_5678);

        assert_eq!(ram.read8(4), 0x78);
        assert_eq!(ram.read8(5), 0x56);
        assert_eq!(ram.read8(6), 0x34);
        assert_eq!(ram.read8(7), 0x12);
        assert_eq!(ram.read16(4), 0x5678);
        assert_eq!(ram.read16(6), 0x1234);
        assert_eq!(ram.read32(4), 0x1234_5678);
    }

    #[test]
    fn check_halfword_is_little_endian() {
        let mut ram = Ram::new(4);
        ram.write16(1, 0xBEEF);

        assert_eq!(ram.read8(1), 0xEF);
        assert_eq!(ram.read8(2), 0xBE);
        assert_eq!(ram.read32(0), 0x00BE_EF00);
    }

    #[test]
    fn check_from_bytes() {
        let ram = Ram::from(vec![0x01, 0x02, 0x03, 0x04]);
        assert_eq!(ram.len(), 4);
        assert_eq!(ram.read32(0), 0x0403_0201);
    }

    #[test]
    fn check_unmapped_accesses_do_not_fault() {
        let mut ram = Ram::new(2);
        ram.write32(0, 0xAABB_CCDD);

        assert_eq!(ram.read16(0), 0xCCDD);
        assert_eq!(ram.read32(0), 0x0000_CCDD);
        assert_eq!(ram.read32(0xFFFF_FFFF), 0x00CC_DD00);
        assert!(Ram::default().is_empty());
    }
}
