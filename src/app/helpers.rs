use actix_web::HttpRequest;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

// It's technically possible to get no IP address from
// the Actix ConnectionInfo, hence the Option.
pub fn real_ip_addr(req: &HttpRequest) -> Option<IpAddr> {
  req.connection_info().realip_remote_addr()
    .and_then(parse_ip)
}

// What Actix hands over may or may not carry a port part,
// and a bare IPv6 address has colons of its own. Try the
// plain address first, then the socket forms "ip:port" and
// "[v6]:port".
fn parse_ip(value: &str) -> Option<IpAddr> {
  IpAddr::from_str(value).ok()
    .or_else(|| SocketAddr::from_str(value).ok().map(|sock| sock.ip()))
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::net::{Ipv4Addr, Ipv6Addr};

  #[test]
  fn parses_ipv4_with_and_without_port() {
    assert_eq!(
      parse_ip("127.0.0.1:8080"),
      Some(IpAddr::V4(Ipv4Addr::LOCALHOST))
    );
    assert_eq!(
      parse_ip("127.0.0.1"),
      Some(IpAddr::V4(Ipv4Addr::LOCALHOST))
    );
  }

  #[test]
  fn bare_ipv6_is_not_mistaken_for_a_port_suffix() {
    assert_eq!(parse_ip("::1"), Some(IpAddr::V6(Ipv6Addr::LOCALHOST)));
  }

  #[test]
  fn bracketed_ipv6_with_port_parses() {
    assert_eq!(
      parse_ip("[::1]:8080"),
      Some(IpAddr::V6(Ipv6Addr::LOCALHOST))
    );
  }

  #[test]
  fn garbage_is_none() {
    assert_eq!(parse_ip("not-an-address"), None);
    assert_eq!(parse_ip(""), None);
  }
}
