// ── New-gateway input validation ──
//
// Pure checks run before any mutation reaches the control plane. Rules are
// evaluated in a fixed order and only the first violation is reported.

use std::net::Ipv4Addr;

use strum::Display;
use thiserror::Error;

/// The operator-supplied fields of a new customer gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum InputField {
    Ip,
    Asn,
    Name,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(InputField),

    #[error("'{0}' is not a dotted-quad IPv4 address with octets 0-255")]
    MalformedIp(String),

    #[error("'{0}' is not a positive integer ASN")]
    InvalidAsn(String),
}

impl ValidationError {
    pub fn field(&self) -> InputField {
        match self {
            Self::Missing(field) => *field,
            Self::MalformedIp(_) => InputField::Ip,
            Self::InvalidAsn(_) => InputField::Asn,
        }
    }
}

/// Gateway input that passed every rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayInput {
    pub ip: Ipv4Addr,
    pub asn: u64,
    pub name: String,
}

/// Validate new-gateway input.
///
/// Checked in order, stopping at the first failure:
/// 1. `ip`, `asn` and `name` are all non-blank
/// 2. `ip` is a dotted quad with every octet in 0-255
/// 3. `asn` is a positive integer
///
/// Private ranges and 32-bit ASN limits are deliberately not checked.
pub fn validate_gateway_input(
    ip: &str,
    asn: &str,
    name: &str,
) -> Result<GatewayInput, ValidationError> {
    let (ip, asn, name) = (ip.trim(), asn.trim(), name.trim());

    for (field, value) in [
        (InputField::Ip, ip),
        (InputField::Asn, asn),
        (InputField::Name, name),
    ] {
        if value.is_empty() {
            return Err(ValidationError::Missing(field));
        }
    }

    let ip_addr = parse_dotted_quad(ip).ok_or_else(|| ValidationError::MalformedIp(ip.to_owned()))?;
    let asn_value = parse_asn(asn).ok_or_else(|| ValidationError::InvalidAsn(asn.to_owned()))?;

    Ok(GatewayInput {
        ip: ip_addr,
        asn: asn_value,
        name: name.to_owned(),
    })
}

/// Validate a display name on its own (used when re-labelling).
pub fn validate_name(name: &str) -> Result<String, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::Missing(InputField::Name));
    }
    Ok(name.to_owned())
}

// Leading zeros are accepted ("010" is octet 10), unlike `Ipv4Addr::from_str`.
fn parse_dotted_quad(s: &str) -> Option<Ipv4Addr> {
    let mut octets = [0u8; 4];
    let mut parts = s.split('.');
    for slot in &mut octets {
        let part = parts.next()?;
        if part.is_empty() || part.len() > 3 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        *slot = part.parse().ok()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(Ipv4Addr::from(octets))
}

fn parse_asn(s: &str) -> Option<u64> {
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse::<u64>().ok().filter(|n| *n > 0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn accepts_valid_input() {
        let input = validate_gateway_input("10.0.0.1", "65000", "site-a").unwrap();
        assert_eq!(
            input,
            GatewayInput {
                ip: Ipv4Addr::new(10, 0, 0, 1),
                asn: 65000,
                name: "site-a".into(),
            }
        );
    }

    #[test]
    fn accepts_boundary_octets_and_large_asn() {
        assert!(validate_gateway_input("0.0.0.0", "1", "x").is_ok());
        assert!(validate_gateway_input("255.255.255.255", "4294967296", "x").is_ok());
        assert_eq!(
            validate_gateway_input("010.001.000.009", "7", "x").unwrap().ip,
            Ipv4Addr::new(10, 1, 0, 9)
        );
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let input = validate_gateway_input(" 10.0.0.2 ", " 65001\t", "  site-b ").unwrap();
        assert_eq!(input.name, "site-b");
        assert_eq!(input.asn, 65001);
    }

    #[test]
    fn rejects_malformed_octets() {
        for ip in ["256.1.1.1", "1.2.3", "1.2.3.4.5", "1..2.3", "a.b.c.d", "1.2.3.-4", "1.2.3.0004", "::1"] {
            assert_eq!(
                validate_gateway_input(ip, "65000", "x"),
                Err(ValidationError::MalformedIp(ip.to_owned())),
                "{ip}"
            );
        }
    }

    #[test]
    fn rejects_non_positive_asn() {
        for asn in ["0", "-5", "abc", "12.5", "+7"] {
            assert_eq!(
                validate_gateway_input("10.0.0.1", asn, "x"),
                Err(ValidationError::InvalidAsn(asn.to_owned())),
                "{asn}"
            );
        }
    }

    #[test]
    fn reports_first_violation_in_order() {
        // Every field is bad; the missing name still wins because emptiness is checked first.
        assert_eq!(
            validate_gateway_input("999.0.0.1", "0", ""),
            Err(ValidationError::Missing(InputField::Name))
        );
        // IP is checked before ASN.
        assert_eq!(
            validate_gateway_input("999.0.0.1", "0", "x"),
            Err(ValidationError::MalformedIp("999.0.0.1".into()))
        );
        // Missing fields are reported in ip, asn, name order.
        assert_eq!(
            validate_gateway_input("", "", ""),
            Err(ValidationError::Missing(InputField::Ip))
        );
        assert_eq!(
            validate_gateway_input("10.0.0.1", "   ", ""),
            Err(ValidationError::Missing(InputField::Asn))
        );
    }

    #[test]
    fn validate_name_rejects_blank() {
        assert_eq!(validate_name(" \t"), Err(ValidationError::Missing(InputField::Name)));
        assert_eq!(validate_name(" hq ").unwrap(), "hq");
    }
}
