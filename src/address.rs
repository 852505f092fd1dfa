use core::fmt;

/// Bluetooth device address, stored little-endian as it goes on air.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacAddress(pub [u8; 6]);

impl MacAddress {
    /// Static random address derived from the two factory device-address
    /// words. The top two bits are forced to `0b11` as required for a static
    /// random address; the rest is fixed per chip, so it survives resets.
    pub fn from_device_id(lo: u32, hi: u32) -> Self {
        let raw = (u64::from(hi) << 32) | u64::from(lo);
        let bytes = raw.to_le_bytes();
        let mut addr = [0u8; 6];
        addr.copy_from_slice(&bytes[..6]);
        addr[5] |= 0xc0;
        Self(addr)
    }

    pub fn bytes(&self) -> [u8; 6] {
        self.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            g, e, d, c, b, a
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_id_becomes_static_random() {
        let addr = MacAddress::from_device_id(0x1f1f_1fff, 0xffff_001f);
        assert_eq!(addr.bytes(), [0xff, 0x1f, 0x1f, 0x1f, 0x1f, 0xc0]);

        let addr = MacAddress::from_device_id(0x4433_2211, 0x0000_0655);
        assert_eq!(addr.bytes()[5], 0xc6);
        assert_eq!(addr.bytes()[..5], [0x11, 0x22, 0x33, 0x44, 0x55]);
    }

    #[test]
    fn same_device_id_same_address() {
        let first = MacAddress::from_device_id(0xdead_beef, 0x1234);
        let second = MacAddress::from_device_id(0xdead_beef, 0x1234);
        assert_eq!(first, second);
    }

    #[test]
    fn displays_most_significant_byte_first() {
        let addr = MacAddress([0xff, 0x1f, 0x1f, 0x1f, 0x1f, 0xc0]);
        assert_eq!(addr.to_string(), "C0:1F:1F:1F:1F:FF");
    }
}
