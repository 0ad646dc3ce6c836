//! Wall clock readout
//!
//! The digital clock shown next to the dial, in local time or a chosen IANA zone.

use chrono::{DateTime, Local, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

/// Zone the wall clock reads in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockZone {
    #[default]
    Local,
    Named(Tz),
}

impl ClockZone {
    /// Parse user input. Blank input means local time.
    pub fn parse(input: &str) -> Result<Self, String> {
        if input.trim().is_empty() {
            return Ok(ClockZone::Local);
        }
        parse_timezone(input).map(ClockZone::Named)
    }

    /// Resolve a stored zone name, falling back to local time
    pub fn from_setting(name: Option<&str>) -> Self {
        match ClockZone::parse(name.unwrap_or_default()) {
            Ok(zone) => zone,
            Err(e) => {
                log::warn!("{}; using local time", e);
                ClockZone::Local
            }
        }
    }

    /// Name to persist, None for local time
    pub fn setting_name(&self) -> Option<&'static str> {
        match self {
            ClockZone::Local => None,
            ClockZone::Named(tz) => Some(tz.name()),
        }
    }
}

impl std::fmt::Display for ClockZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClockZone::Local => write!(f, "Local"),
            ClockZone::Named(tz) => write!(f, "{}", tz.name()),
        }
    }
}

/// One reading of the wall clock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WallTime {
    /// Hour in 24-hour format (0-23)
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    /// Time zone abbreviation (e.g., "PST")
    pub tz_abbrev: String,
}

impl WallTime {
    /// Format as "HH:MM:SS"
    pub fn format_time(&self) -> String {
        format!("{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

/// Read the wall clock now
pub fn read_wall_clock(zone: ClockZone) -> WallTime {
    read_wall_clock_at(zone, Utc::now())
}

/// Read the wall clock at a specific instant
pub fn read_wall_clock_at(zone: ClockZone, now_utc: DateTime<Utc>) -> WallTime {
    match zone {
        ClockZone::Local => wall_time(now_utc.with_timezone(&Local)),
        ClockZone::Named(tz) => wall_time(now_utc.with_timezone(&tz)),
    }
}

fn wall_time<T: TimeZone>(local: DateTime<T>) -> WallTime
where
    T::Offset: std::fmt::Display,
{
    WallTime {
        hour: local.hour(),
        minute: local.minute(),
        second: local.second(),
        tz_abbrev: local.format("%Z").to_string(),
    }
}

/// Parse a timezone name into a Tz
pub fn parse_timezone(tz_str: &str) -> Result<Tz, String> {
    tz_str
        .trim()
        .parse::<Tz>()
        .map_err(|_| format!("Invalid timezone: {}", tz_str))
}
