//! Database rows to API models.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use uuid::Uuid;

use gyemini_db::models::{CalculatorStatRow, DdayRow, PostRow, PostSummaryRow, RequestRow};
use gyemini_types::models::{CalculatorStat, ContactRequest, DdayFavorite, Post, PostSummary};

/// SQLite `datetime('now')` text, which is always UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .with_context(|| format!("bad timestamp {:?}", raw))?;
    Ok(naive.and_utc())
}

pub fn dday(row: DdayRow) -> Result<DdayFavorite> {
    Ok(DdayFavorite {
        id: Uuid::parse_str(&row.id).with_context(|| format!("bad dday id {:?}", row.id))?,
        target_date: NaiveDate::parse_from_str(&row.target_date, "%Y-%m-%d")
            .with_context(|| format!("bad target date {:?}", row.target_date))?,
        created_at: parse_timestamp(&row.created_at)?,
        updated_at: parse_timestamp(&row.updated_at)?,
        user_id: row.user_id,
        name: row.name,
        goal_amount: row.goal_amount,
    })
}

pub fn post(row: PostRow) -> Result<Post> {
    Ok(Post {
        id: row.id,
        created_at: parse_timestamp(&row.created_at)?,
        updated_at: parse_timestamp(&row.updated_at)?,
        user_id: row.user_id,
        title: row.title,
        content: row.content,
        author_name: row.author_name,
        views: row.views,
    })
}

pub fn post_summary(row: PostSummaryRow) -> Result<PostSummary> {
    Ok(PostSummary {
        id: row.id,
        created_at: parse_timestamp(&row.created_at)?,
        updated_at: parse_timestamp(&row.updated_at)?,
        user_id: row.user_id,
        title: row.title,
        author_name: row.author_name,
        views: row.views,
    })
}

pub fn contact_request(row: RequestRow) -> Result<ContactRequest> {
    Ok(ContactRequest {
        id: row.id,
        created_at: parse_timestamp(&row.created_at)?,
        name: row.name,
        email: row.email,
        subject: row.subject,
        message: row.message,
        status: row.status,
    })
}

pub fn calculator_stat(row: CalculatorStatRow) -> Result<CalculatorStat> {
    Ok(CalculatorStat {
        last_clicked_at: row.last_clicked_at.as_deref().map(parse_timestamp).transpose()?,
        id: row.id,
        name: row.name,
        icon: row.icon,
        click_count: row.click_count,
    })
}
