use chrono::{DateTime, Local, Utc};

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    /// Short local date label, e.g. `10/18/2026`.
    fn today(&self) -> String;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> String {
        date_label(&Local::now())
    }
}

pub fn date_label<Tz: chrono::TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%-m/%-d/%Y").to_string()
}
