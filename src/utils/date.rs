use chrono::NaiveDate;

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Short weekday label, e.g. "Mon".
pub fn weekday_label(d: NaiveDate) -> String {
    d.format("%a").to_string()
}
