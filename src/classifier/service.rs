//! Well-known port to service name mapping.

use std::borrow::Cow;

/// Resolve a port to a service mnemonic, or its decimal string.
pub fn service_name(port: u16) -> Cow<'static, str> {
    let name = match port {
        80 => "HTTP",
        443 => "HTTPS",
        53 => "DNS",
        22 => "SSH",
        21 => "FTP",
        25 => "SMTP",
        110 => "POP3",
        143 => "IMAP",
        67 | 68 => "DHCP",
        123 => "NTP",
        1900 => "SSDP",
        5353 => "mDNS",
        other => return Cow::Owned(other.to_string()),
    };
    Cow::Borrowed(name)
}
