use anyhow::bail;
use chrono::NaiveDateTime;

const ACCEPTED_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

/// Picks the timestamp to estimate for: an explicit override if given, otherwise `now`.
pub fn resolve_timestamp(arg: Option<&str>, now: NaiveDateTime) -> anyhow::Result<NaiveDateTime> {
    let Some(s) = arg else {
        return Ok(now);
    };

    let s = s.trim();
    for fmt in ACCEPTED_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(ts);
        }
    }
    bail!("unrecognized timestamp {s:?}; expected one of {ACCEPTED_FORMATS:?}")
}
