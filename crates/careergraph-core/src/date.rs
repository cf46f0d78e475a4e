use chrono::NaiveDate;
use regex::Regex;

/// Length of a year in days, smoothing over leap years.
pub const DAYS_PER_YEAR: f64 = 365.25;

fn iso_date_regex() -> &'static Regex {
    static RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex"))
}

/// Returns `true` when `raw` has the `YYYY-MM-DD` shape (calendar validity is not checked).
pub fn is_iso_date_shape(raw: &str) -> bool {
    iso_date_regex().is_match(raw.trim())
}

/// Parses a strict `YYYY-MM-DD` date.
///
/// `chrono` alone would accept unpadded months and days; the shape check rejects them so that the
/// validator and the layout engine agree on what counts as a date.
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if !is_iso_date_shape(raw) {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Fractional years from `origin` to `date` (negative when `date` is earlier).
pub fn years_between(date: NaiveDate, origin: NaiveDate) -> f64 {
    (date - origin).num_days() as f64 / DAYS_PER_YEAR
}

pub fn format_month_year(date: NaiveDate) -> String {
    date.format("%b %Y").to_string()
}

/// Human-readable range such as `Jan 2020 - Present`.
///
/// Unparsable dates are echoed verbatim rather than dropped.
pub fn format_date_range(start: &str, end: Option<&str>) -> String {
    let fmt_one = |raw: &str| match parse_iso_date(raw) {
        Some(d) => format_month_year(d),
        None => raw.trim().to_string(),
    };
    let end = match end.map(str::trim).filter(|e| !e.is_empty()) {
        Some(e) => fmt_one(e),
        None => "Present".to_string(),
    };
    format!("{} - {}", fmt_one(start), end)
}
