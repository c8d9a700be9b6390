//! Text rendering of link-layer addresses.

use macaddr::MacAddr6;

/// Format a MAC as lowercase colon-separated hex (aa:bb:cc:dd:ee:ff).
///
/// `MacAddr6`'s own `Display` is uppercase, which the snapshot format does
/// not use.
pub fn format_mac(mac: &MacAddr6) -> String {
    mac.as_bytes()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(":")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_mac_lowercase() {
        let mac = MacAddr6::new(0xAA, 0x0B, 0xCC, 0x01, 0xEE, 0xFF);
        assert_eq!(format_mac(&mac), "aa:0b:cc:01:ee:ff");
    }

    #[test]
    fn test_format_mac_nil() {
        assert_eq!(format_mac(&MacAddr6::nil()), "00:00:00:00:00:00");
    }
}
