use std::fmt;
use std::str::FromStr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// file modification time with nanosecond precision
///
/// rendered as `<secs>.<nanos>` with exactly nine fractional digits, so two
/// mtimes compare equal exactly when their commit fields are byte-identical.
/// `nanos` is always in `0..1_000_000_000`; times before the epoch carry a
/// negative `secs`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Mtime {
    secs: i64,
    nanos: u32,
}

const NANOS_PER_SEC: u32 = 1_000_000_000;

impl Mtime {
    pub fn new(secs: i64, nanos: u32) -> Self {
        let carry = (nanos / NANOS_PER_SEC) as i64;
        Self {
            secs: secs + carry,
            nanos: nanos % NANOS_PER_SEC,
        }
    }

    pub fn from_system_time(time: SystemTime) -> Self {
        match time.duration_since(UNIX_EPOCH) {
            Ok(d) => Self::new(d.as_secs() as i64, d.subsec_nanos()),
            Err(e) => {
                let d = e.duration();
                if d.subsec_nanos() == 0 {
                    Self::new(-(d.as_secs() as i64), 0)
                } else {
                    Self::new(-(d.as_secs() as i64) - 1, NANOS_PER_SEC - d.subsec_nanos())
                }
            }
        }
    }

    pub fn to_system_time(self) -> SystemTime {
        if self.secs >= 0 {
            UNIX_EPOCH + Duration::new(self.secs as u64, self.nanos)
        } else {
            UNIX_EPOCH - Duration::from_secs(self.secs.unsigned_abs())
                + Duration::from_nanos(self.nanos as u64)
        }
    }

    pub fn secs(&self) -> i64 {
        self.secs
    }

    pub fn nanos(&self) -> u32 {
        self.nanos
    }
}

impl fmt::Display for Mtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}", self.secs, self.nanos)
    }
}

impl FromStr for Mtime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (secs, frac) = s.split_once('.').unwrap_or((s, ""));
        let secs: i64 = secs
            .parse()
            .map_err(|_| format!("invalid mtime seconds: {s:?}"))?;

        if frac.len() > 9 || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!("invalid mtime fraction: {s:?}"));
        }
        let nanos = if frac.is_empty() {
            0
        } else {
            let padded = format!("{frac:0<9}");
            padded
                .parse::<u32>()
                .map_err(|_| format!("invalid mtime fraction: {s:?}"))?
        };

        Ok(Self::new(secs, nanos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_fixed_width() {
        assert_eq!(Mtime::new(1700000000, 5).to_string(), "1700000000.000000005");
        assert_eq!(Mtime::new(0, 0).to_string(), "0.000000000");
    }

    #[test]
    fn test_parse_display_roundtrip() {
        let m = Mtime::new(1234567890, 123456789);
        assert_eq!(m.to_string().parse::<Mtime>().unwrap(), m);
    }

    #[test]
    fn test_parse_short_fraction() {
        assert_eq!("12.5".parse::<Mtime>().unwrap(), Mtime::new(12, 500_000_000));
        assert_eq!("12".parse::<Mtime>().unwrap(), Mtime::new(12, 0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("abc".parse::<Mtime>().is_err());
        assert!("1.2x".parse::<Mtime>().is_err());
        assert!("1.1234567890".parse::<Mtime>().is_err());
    }

    #[test]
    fn test_system_time_roundtrip() {
        let t = UNIX_EPOCH + Duration::new(1_600_000_000, 987_654_321);
        let m = Mtime::from_system_time(t);
        assert_eq!(m, Mtime::new(1_600_000_000, 987_654_321));
        assert_eq!(m.to_system_time(), t);
    }

    #[test]
    fn test_before_epoch() {
        let t = UNIX_EPOCH - Duration::new(1, 250_000_000);
        let m = Mtime::from_system_time(t);
        assert_eq!(m, Mtime::new(-2, 750_000_000));
        assert_eq!(m.to_system_time(), t);
    }
}
