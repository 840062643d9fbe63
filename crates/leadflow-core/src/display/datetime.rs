//! DateTime display utilities.

use std::fmt;

use jiff::{tz::TimeZone, Timestamp};

/// A `Timestamp` rendered in the system timezone as `YYYY-MM-DD HH:MM:SS TZ`.
///
/// Stored values stay in UTC; only display converts.
pub struct LocalDateTime<'a>(pub &'a Timestamp);

impl<'a> LocalDateTime<'a> {
    fn render(&self, tz: TimeZone) -> impl fmt::Display {
        self.0.to_zoned(tz).strftime("%Y-%m-%d %H:%M:%S %Z").to_string()
    }
}

impl<'a> fmt::Display for LocalDateTime<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(TimeZone::system()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_in_given_zone() {
        let ts = Timestamp::from_second(1_640_995_200).unwrap();
        let rendered = LocalDateTime(&ts).render(TimeZone::UTC).to_string();
        assert_eq!(rendered, "2022-01-01 00:00:00 UTC");
    }
}
