//! CLI to Config conversion utilities

use crate::error::{Error, Result};

/// Parse a numeric command-line argument
///
/// Rejects anything that is not a finite number, so a typo surfaces as a
/// parse error instead of propagating NaN or infinity into the scheduler.
pub fn parse_bound(what: &'static str, input: &str) -> Result<f64> {
    let value: f64 = input.trim().parse().map_err(|_| Error::Parse {
        what,
        input: input.to_string(),
    })?;

    if !value.is_finite() {
        return Err(Error::Parse {
            what,
            input: input.to_string(),
        });
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_and_padded_numbers() {
        assert_eq!(parse_bound("lower bound", "1.5").unwrap(), 1.5);
        assert_eq!(parse_bound("lower bound", " -2 ").unwrap(), -2.0);
        assert_eq!(parse_bound("error threshold", "1e-3").unwrap(), 0.001);
    }

    #[test]
    fn test_reject_non_numeric() {
        let err = parse_bound("upper bound", "abc").unwrap_err();
        match err {
            Error::Parse { what, input } => {
                assert_eq!(what, "upper bound");
                assert_eq!(input, "abc");
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_reject_non_finite() {
        assert!(parse_bound("lower bound", "inf").is_err());
        assert!(parse_bound("lower bound", "NaN").is_err());
    }
}
