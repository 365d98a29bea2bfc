//! The line protocol spoken with the telemetry plugin

/// Request token the client sends every interval
pub const REQUEST_TOKEN: &str = "telemetry";

/// Field delimiter in responses
pub const FIELD_DELIMITER: char = '*';

/// Parse one response line: `<speed_kph>*<schedule_flag>`.
///
/// The flag is a strict 0/1. A malformed field yields `None` and the
/// caller keeps the previous snapshot; a partial overwrite is never
/// performed.
pub fn parse_response(line: &str) -> Option<(f32, bool)> {
    let mut fields = line.split(FIELD_DELIMITER);

    let speed = fields.next()?.trim().parse::<f32>().ok()?;
    let schedule = match fields.next()?.trim() {
        "0" => false,
        "1" => true,
        _ => return None,
    };

    Some((speed, schedule))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_response() {
        assert_eq!(parse_response("42.5*1"), Some((42.5, true)));
        assert_eq!(parse_response("0*0"), Some((0.0, false)));
        assert_eq!(parse_response("0.0*0"), Some((0.0, false)));
    }

    #[test]
    fn test_parse_tolerates_line_endings() {
        assert_eq!(parse_response("42.5*1\r".trim_end()), Some((42.5, true)));
        assert_eq!(parse_response(" 12.0 * 1 "), Some((12.0, true)));
    }

    #[test]
    fn test_bad_speed_rejected() {
        assert_eq!(parse_response("bad*1"), None);
    }

    #[test]
    fn test_bad_flag_rejected() {
        assert_eq!(parse_response("42.5*x"), None);
        assert_eq!(parse_response("42.5*2"), None);
    }

    #[test]
    fn test_missing_field_rejected() {
        assert_eq!(parse_response("42.5"), None);
        assert_eq!(parse_response(""), None);
    }
}
