//! The timestamp command

use crate::cli::TimestampArgs;
use crate::error::Result;
use crate::output::OutputWriter;
use chrono::{DateTime, Local, SecondsFormat, Utc};
use serde::Serialize;

/// Current time as shown to the user and as written into a statement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimestampReport {
    pub local_time: String,
    pub utc_time: String,
    /// RFC 3339 with millisecond precision and a `Z` offset
    pub timestamp: String,
}

impl TimestampReport {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            local_time: now.with_timezone(&Local).format("%H:%M:%S").to_string(),
            utc_time: now.format("%H:%M:%S").to_string(),
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Handle the timestamp command
pub fn handle_timestamp(args: TimestampArgs, output: &mut OutputWriter) -> Result<()> {
    let report = TimestampReport::at(Utc::now());

    if args.utc {
        return output.writeln(&report.timestamp);
    }
    if !output.is_human() {
        return output.data(&report);
    }

    output.writeln(&format!(
        "Current local time is {}. (UTC: {})",
        report.local_time, report.utc_time
    ))?;
    output.writeln(&format!("xAPI timestamp: {}", report.timestamp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_is_xapi_ready() {
        let now = Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap();
        let report = TimestampReport::at(now);

        assert_eq!(report.utc_time, "09:26:53");
        assert_eq!(report.timestamp, "2025-03-14T09:26:53.000Z");
        assert!(xapi_schemas::FormatRegistry::with_defaults()
            .check("date-time", &report.timestamp)
            .unwrap_or(false));
    }
}
