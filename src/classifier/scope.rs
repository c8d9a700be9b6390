//! LAN/INTERNET scope classification.

use std::net::Ipv4Addr;

use crate::domain::Scope;

/// True for 10.0.0.0/8, 172.16.0.0/12 and 192.168.0.0/16.
pub fn is_private_addr(addr: Ipv4Addr) -> bool {
    let [a, b, _, _] = addr.octets();
    a == 10 || (a == 172 && (16..=31).contains(&b)) || (a == 192 && b == 168)
}

/// Dotted-quad variant of [`is_private_addr`].
///
/// Anything that is not exactly four decimal octets is never private.
pub fn is_private_ip(ip: &str) -> bool {
    let octets = match ip
        .split('.')
        .map(|part| part.parse::<u8>())
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(octets) => octets,
        Err(_) => return false,
    };

    match octets.as_slice() {
        [a, b, c, d] => is_private_addr(Ipv4Addr::new(*a, *b, *c, *d)),
        _ => false,
    }
}

/// LAN iff both endpoints are private.
pub fn classify_scope(src: Ipv4Addr, dst: Ipv4Addr) -> Scope {
    if is_private_addr(src) && is_private_addr(dst) {
        Scope::Lan
    } else {
        Scope::Internet
    }
}
