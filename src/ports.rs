//! Parses port-list expressions like `"27015,27020-27022"` into a concrete set of port
//! numbers, for sweeping a small range of query ports from the command line.

use std::collections::BTreeSet;

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PortExpressionError {
    #[error("'{0}' is not a valid port number or range")]
    InvalidToken(String),

    #[error("port {0} is out of range")]
    OutOfRange(u32),

    #[error("range '{start}-{end}' has start greater than end")]
    BackwardsRange { start: u16, end: u16 },
}

fn parse_port(token: &str) -> Result<u16, PortExpressionError> {
    let value: u32 = token
        .parse()
        .map_err(|_| PortExpressionError::InvalidToken(token.to_string()))?;
    u16::try_from(value).map_err(|_| PortExpressionError::OutOfRange(value))
}

/// Parses a comma-separated list of port numbers and `start-end` ranges into a sorted, deduped
/// set of ports. Empty tokens (from trailing/doubled commas) are ignored.
pub fn parse_port_expression(expr: &str) -> Result<BTreeSet<u16>, PortExpressionError> {
    let mut ports = BTreeSet::new();

    for token in expr.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        match token.split_once('-') {
            Some((start, end)) => {
                let start = parse_port(start)?;
                let end = parse_port(end)?;
                if start > end {
                    return Err(PortExpressionError::BackwardsRange { start, end });
                }
                ports.extend(start..=end);
            }
            None => {
                ports.insert(parse_port(token)?);
            }
        }
    }

    Ok(ports)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_ports_and_a_range() {
        let ports = parse_port_expression("27015,27020-27022").unwrap();
        assert_eq!(
            ports,
            BTreeSet::from([27015, 27020, 27021, 27022])
        );
    }

    #[test]
    fn dedupes_overlapping_entries() {
        let ports = parse_port_expression("27015,27014-27016").unwrap();
        assert_eq!(ports, BTreeSet::from([27014, 27015, 27016]));
    }

    #[test]
    fn rejects_out_of_range_port() {
        let err = parse_port_expression("70000").unwrap_err();
        assert_eq!(err, PortExpressionError::OutOfRange(70000));
    }

    #[test]
    fn rejects_backwards_range() {
        let err = parse_port_expression("27020-27015").unwrap_err();
        assert_eq!(
            err,
            PortExpressionError::BackwardsRange { start: 27020, end: 27015 }
        );
    }

    #[test]
    fn rejects_non_numeric_token() {
        assert!(matches!(
            parse_port_expression("abc"),
            Err(PortExpressionError::InvalidToken(_))
        ));
    }

    #[test]
    fn ignores_trailing_comma() {
        let ports = parse_port_expression("27015,").unwrap();
        assert_eq!(ports, BTreeSet::from([27015]));
    }
}
