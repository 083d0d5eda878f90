use chrono::{Datelike, Duration, NaiveDate, Utc, Weekday};
use serde::Serialize;

use crate::{CalcError, Result, require_finite};

/// The app's users are in Korea; "today" means the KST calendar day.
const KST_OFFSET_HOURS: i64 = 9;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DdayResult {
    pub name: String,
    pub target_date: NaiveDate,
    pub date_label: String,
    /// Absolute distance in calendar days.
    pub days: i64,
    pub is_past: bool,
    pub is_today: bool,
    /// Share of the current year already elapsed, one decimal place.
    pub year_progress: f64,
    pub daily_goal: Option<f64>,
    pub total_goal: Option<f64>,
}

pub fn today_kst() -> NaiveDate {
    (Utc::now() + Duration::hours(KST_OFFSET_HOURS)).date_naive()
}

pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| CalcError::InvalidInput(format!("invalid date '{}', expected YYYY-MM-DD", raw)))
}

pub fn calculate(
    name: Option<&str>,
    target: NaiveDate,
    goal: Option<f64>,
    today: NaiveDate,
) -> Result<DdayResult> {
    let total_goal = match goal {
        Some(g) => {
            let g = require_finite("goal amount", g)?;
            if g < 0.0 {
                return Err(CalcError::InvalidInput("goal amount must not be negative".into()));
            }
            Some(g)
        }
        None => None,
    };

    let diff = (target - today).num_days();
    let is_past = diff < 0;
    let is_today = diff == 0;

    let daily_goal = match total_goal {
        Some(g) if g > 0.0 && diff > 0 => Some(g / diff as f64),
        _ => None,
    };

    let name = name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or("목표일")
        .to_string();

    Ok(DdayResult {
        name,
        target_date: target,
        date_label: korean_date_label(target),
        days: diff.abs(),
        is_past,
        is_today,
        year_progress: year_progress(today),
        daily_goal,
        total_goal,
    })
}

pub fn year_progress(today: NaiveDate) -> f64 {
    let year = today.year();
    let (Some(start), Some(end)) = (
        NaiveDate::from_ymd_opt(year, 1, 1),
        NaiveDate::from_ymd_opt(year, 12, 31),
    ) else {
        return 0.0;
    };

    let total = (end - start).num_days() as f64;
    let passed = (today - start).num_days() as f64;
    (passed / total * 1000.0).round() / 10.0
}

pub fn korean_date_label(date: NaiveDate) -> String {
    format!(
        "{}년 {}월 {}일 {}",
        date.year(),
        date.month(),
        date.day(),
        korean_weekday(date.weekday())
    )
}

fn korean_weekday(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "월요일",
        Weekday::Tue => "화요일",
        Weekday::Wed => "수요일",
        Weekday::Thu => "목요일",
        Weekday::Fri => "금요일",
        Weekday::Sat => "토요일",
        Weekday::Sun => "일요일",
    }
}
