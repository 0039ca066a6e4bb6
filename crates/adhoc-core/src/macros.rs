//! `$__` time macros expanded before a dashboard query reaches Databend.
//!
//! | macro | expansion |
//! |---|---|
//! | `$__fromTime` / `$__toTime` | `TO_TIMESTAMP(<unix seconds>)` |
//! | `$__timeFilter(col)` | `col >= '<from s>' AND col <= '<to s>'` |
//! | `$__timeFilter_ms(col)` | same, in milliseconds |
//! | `$__dateFilter(col)` | `col >= 'YYYY-MM-DD' AND col <= 'YYYY-MM-DD'` |
//! | `$__timeInterval(col)` / `$__timeInterval_ms(col)` | `col` bucketed to the panel interval |
//! | `$__interval_s` | panel interval in seconds |
//!
//! Unknown macros are left in place.

use crate::error::MacroError;
use chrono::{DateTime, Utc};
use std::time::Duration;

const MACRO_PREFIX: &str = "$__";

/// Inclusive time range selected on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

/// Everything macro expansion depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryContext {
    pub time_range: TimeRange,
    /// Suggested bucket width for the panel
    pub interval: Duration,
}

impl QueryContext {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>, interval: Duration) -> Self {
        Self {
            time_range: TimeRange { from, to },
            interval,
        }
    }

    /// Interval in whole seconds, never less than one.
    pub fn interval_secs(&self) -> u64 {
        self.interval.as_secs().max(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Macro {
    FromTime,
    ToTime,
    TimeFilter,
    TimeFilterMs,
    DateFilter,
    TimeInterval,
    IntervalSeconds,
}

impl Macro {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "fromTime" => Some(Macro::FromTime),
            "toTime" => Some(Macro::ToTime),
            "timeFilter" => Some(Macro::TimeFilter),
            "timeFilter_ms" => Some(Macro::TimeFilterMs),
            "dateFilter" => Some(Macro::DateFilter),
            "timeInterval" | "timeInterval_ms" => Some(Macro::TimeInterval),
            "interval_s" => Some(Macro::IntervalSeconds),
            _ => None,
        }
    }

    fn expand(self, name: &str, args: &[String], ctx: &QueryContext) -> Result<String, MacroError> {
        let TimeRange { from, to } = ctx.time_range;
        let column = || {
            args.first()
                .filter(|arg| !arg.is_empty())
                .ok_or_else(|| MacroError::missing_argument(name))
        };

        let expansion = match self {
            Macro::FromTime => format!("TO_TIMESTAMP({})", from.timestamp()),
            Macro::ToTime => format!("TO_TIMESTAMP({})", to.timestamp()),
            Macro::TimeFilter => {
                let col = column()?;
                format!(
                    "{col} >= '{}' AND {col} <= '{}'",
                    from.timestamp(),
                    to.timestamp()
                )
            }
            Macro::TimeFilterMs => {
                let col = column()?;
                format!(
                    "{col} >= '{}' AND {col} <= '{}'",
                    from.timestamp_millis(),
                    to.timestamp_millis()
                )
            }
            Macro::DateFilter => {
                let col = column()?;
                format!(
                    "{col} >= '{}' AND {col} <= '{}'",
                    from.format("%Y-%m-%d"),
                    to.format("%Y-%m-%d")
                )
            }
            Macro::TimeInterval => {
                let col = column()?;
                let n = ctx.interval_secs();
                format!("TO_TIMESTAMP( TO_UNIX_TIMESTAMP(TO_TIMESTAMP({col})) // {n} * {n})")
            }
            Macro::IntervalSeconds => ctx.interval_secs().to_string(),
        };
        Ok(expansion)
    }
}

/// Expand every known `$__` macro in `sql` against `ctx`.
///
/// # Example
/// ```
/// use adhoc_core::macros::{interpolate, QueryContext};
/// use chrono::{TimeZone, Utc};
/// use std::time::Duration;
///
/// let ctx = QueryContext::new(
///     Utc.timestamp_opt(1415792726, 0).unwrap(),
///     Utc.timestamp_opt(1447328726, 0).unwrap(),
///     Duration::from_secs(20),
/// );
/// let sql = interpolate("SELECT * FROM logs WHERE $__timeFilter(ts)", &ctx).unwrap();
/// assert_eq!(sql, "SELECT * FROM logs WHERE ts >= '1415792726' AND ts <= '1447328726'");
/// ```
pub fn interpolate(sql: &str, ctx: &QueryContext) -> Result<String, MacroError> {
    let mut out = String::with_capacity(sql.len());
    let mut rest = sql;

    while let Some(start) = rest.find(MACRO_PREFIX) {
        out.push_str(&rest[..start]);
        let after = &rest[start + MACRO_PREFIX.len()..];
        let name_len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after.len());
        let name = &after[..name_len];
        let mut consumed = MACRO_PREFIX.len() + name_len;

        let Some(kind) = Macro::from_name(name) else {
            out.push_str(&rest[start..start + consumed]);
            rest = &rest[start + consumed..];
            continue;
        };

        let args = if after[name_len..].starts_with('(') {
            let (args, len) = split_args(name, &after[name_len..])?;
            consumed += len;
            args
        } else {
            Vec::new()
        };

        out.push_str(&kind.expand(name, &args, ctx)?);
        rest = &rest[start + consumed..];
    }

    out.push_str(rest);
    Ok(out)
}

/// Split a parenthesised argument list on top-level commas.
///
/// `text` starts at the opening parenthesis. Returns the trimmed arguments and
/// the number of bytes up to and including the closing parenthesis.
fn split_args(name: &str, text: &str) -> Result<(Vec<String>, usize), MacroError> {
    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut current_start = 1;

    for (i, c) in text.char_indices() {
        match c {
            '\'' => in_string = !in_string,
            _ if in_string => {}
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    args.push(text[current_start..i].trim().to_string());
                    if args.len() == 1 && args[0].is_empty() {
                        args.clear();
                    }
                    return Ok((args, i + 1));
                }
            }
            ',' if depth == 1 => {
                args.push(text[current_start..i].trim().to_string());
                current_start = i + 1;
            }
            _ => {}
        }
    }

    Err(MacroError::unterminated(name))
}
