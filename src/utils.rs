use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

use chrono::{FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use rand::{Rng, distr::Alphanumeric};
use serde_json::Value;

use crate::{Error, Res, success};

/// Key extracted from a payload by `--trim`.
pub const TRIM_KEY: &str = "items";

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Random value for the OAuth `state` parameter.
pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Where a command's JSON goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

impl FromStr for OutputTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Err("output path must not be empty".to_string()),
            "-" => Ok(OutputTarget::Stdout),
            path => Ok(OutputTarget::File(PathBuf::from(path))),
        }
    }
}

impl OutputTarget {
    /// Target for one ID of a file-driven command: stdout stays stdout, a
    /// directory gets `<dir>/<id>.json`, anything else becomes `<id>.json` in
    /// the working directory.
    pub fn for_id(&self, id: &str) -> OutputTarget {
        match self {
            OutputTarget::Stdout => OutputTarget::Stdout,
            OutputTarget::File(path) if path.is_dir() => {
                OutputTarget::File(path.join(format!("{}.json", id)))
            }
            OutputTarget::File(_) => OutputTarget::File(PathBuf::from(format!("{}.json", id))),
        }
    }
}

/// Replaces a payload with the value under [`TRIM_KEY`].
pub fn trim_items(mut data: Value) -> Res<Value> {
    match data.get_mut(TRIM_KEY) {
        Some(items) => Ok(items.take()),
        None => Err(Error::Input(format!(
            "response has no `{}` key to trim to; use --full",
            TRIM_KEY
        ))),
    }
}

/// Writes `data` to the target.
///
/// Files get indented JSON at the path with its extension replaced by
/// `.json`; stdout gets one compact line.
pub async fn write_output(data: &Value, target: &OutputTarget) -> Res<()> {
    match target {
        OutputTarget::Stdout => {
            println!("{}", serde_json::to_string(data)?);
        }
        OutputTarget::File(path) => {
            let path = path.with_extension("json");
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                async_fs::create_dir_all(parent).await?;
            }
            async_fs::write(&path, serde_json::to_string_pretty(data)?).await?;
            success!("Wrote {}", path.display());
        }
    }
    Ok(())
}

/// Reads a newline-delimited `.txt` or `.csv` file of IDs.
///
/// Blank lines are skipped; for CSV lines only the first field is used.
pub async fn read_id_file(path: &Path) -> Res<Vec<String>> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("txt") | Some("csv") => {}
        _ => {
            return Err(Error::Input(
                "Provide a .txt or .csv file with one ID per line.".to_string(),
            ));
        }
    }

    let content = async_fs::read_to_string(path).await?;
    Ok(parse_ids(&content))
}

pub fn parse_ids(content: &str) -> Vec<String> {
    content
        .lines()
        .filter_map(|line| line.split(',').next())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

/// Time zone used to interpret a `get-recently-played` timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeZoneArg {
    Local,
    Fixed(FixedOffset),
    /// IANA zone such as `America/Tijuana`, with daylight saving applied.
    Named(Tz),
}

/// Parses `local`, `utc`, an IANA zone name (`America/Tijuana`) or a UTC
/// offset such as `+02:00`, `-0700`, `-07`.
pub fn parse_time_zone(s: &str) -> Result<TimeZoneArg, String> {
    let trimmed = s.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "local" => return Ok(TimeZoneArg::Local),
        "utc" | "z" => {
            return FixedOffset::east_opt(0)
                .map(TimeZoneArg::Fixed)
                .ok_or_else(|| "invalid offset".to_string());
        }
        _ => {}
    }

    let invalid = || {
        format!(
            "invalid time zone `{}`; use local, utc, a zone name like America/Tijuana or an offset like -07:00",
            s
        )
    };

    let (sign, rest) = match trimmed.split_at_checked(1) {
        Some(("+", rest)) => (1, rest),
        Some(("-", rest)) => (-1, rest),
        _ => {
            return trimmed
                .parse::<Tz>()
                .map(TimeZoneArg::Named)
                .map_err(|_| invalid());
        }
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let (hours, minutes) = match digits.len() {
        2 => (digits.parse::<i32>().map_err(|_| invalid())?, 0),
        4 => (
            digits[..2].parse::<i32>().map_err(|_| invalid())?,
            digits[2..].parse::<i32>().map_err(|_| invalid())?,
        ),
        _ => return Err(invalid()),
    };
    if minutes >= 60 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .map(TimeZoneArg::Fixed)
        .ok_or_else(invalid)
}

/// Parses a date (`2022-08-10`) or date-time (`2022-08-10T18:30:00`).
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime, String> {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| format!("invalid date `{}`", s));
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .ok_or_else(|| format!("invalid timestamp `{}`; use YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS", s))
}

/// Converts a wall-clock time in `tz` to Unix milliseconds, truncated to the
/// second.
pub fn to_unix_millis(datetime: NaiveDateTime, tz: TimeZoneArg) -> Res<i64> {
    let seconds = match tz {
        TimeZoneArg::Local => Local
            .from_local_datetime(&datetime)
            .earliest()
            .map(|dt| dt.timestamp()),
        TimeZoneArg::Fixed(offset) => offset
            .from_local_datetime(&datetime)
            .single()
            .map(|dt| dt.timestamp()),
        TimeZoneArg::Named(tz) => tz
            .from_local_datetime(&datetime)
            .earliest()
            .map(|dt| dt.timestamp()),
    };

    seconds
        .map(|s| s * 1_000)
        .ok_or_else(|| Error::Input(format!("{} does not exist in the given time zone", datetime)))
}
