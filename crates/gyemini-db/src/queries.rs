use crate::Database;
use crate::models::{CalculatorStatRow, DdayRow, OwnedChange, PostRow, PostSummaryRow, RequestRow};
use anyhow::Result;
use rusqlite::{Connection, Row};

const DDAY_COLUMNS: &str = "id, user_id, name, target_date, goal_amount, created_at, updated_at";
const POST_COLUMNS: &str = "id, user_id, title, content, author_name, views, created_at, updated_at";
const REQUEST_COLUMNS: &str = "id, name, email, subject, message, status, created_at";
const STAT_COLUMNS: &str = "id, name, icon, click_count, last_clicked_at";

impl Database {
    // -- D-days --

    pub fn list_ddays(&self, user_id: &str) -> Result<Vec<DdayRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {DDAY_COLUMNS} FROM dday_favorites
                 WHERE user_id = ?1
                 ORDER BY created_at DESC, rowid DESC"
            ))?;
            let rows = stmt
                .query_map([user_id], dday_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn insert_dday(
        &self,
        id: &str,
        user_id: &str,
        name: &str,
        target_date: &str,
        goal_amount: Option<f64>,
    ) -> Result<DdayRow> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO dday_favorites (id, user_id, name, target_date, goal_amount)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![id, user_id, name, target_date, goal_amount],
            )?;
            let row = conn.query_row(
                &format!("SELECT {DDAY_COLUMNS} FROM dday_favorites WHERE id = ?1"),
                [id],
                dday_from_row,
            )?;
            Ok(row)
        })
    }

    /// Returns true when a row owned by `user_id` was removed.
    pub fn delete_dday(&self, id: &str, user_id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "DELETE FROM dday_favorites WHERE id = ?1 AND user_id = ?2",
                [id, user_id],
            )?;
            Ok(changed > 0)
        })
    }

    // -- Posts --

    pub fn count_posts(&self) -> Result<u64> {
        self.with_conn(|conn| {
            let total: i64 = conn.query_row("SELECT COUNT(*) FROM posts", [], |r| r.get(0))?;
            Ok(total as u64)
        })
    }

    pub fn list_posts(&self, limit: u32, offset: u64) -> Result<Vec<PostSummaryRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, title, author_name, views, created_at, updated_at
                 FROM posts
                 ORDER BY created_at DESC, id DESC
                 LIMIT ?1 OFFSET ?2",
            )?;
            let rows = stmt
                .query_map(rusqlite::params![limit, offset as i64], |row| {
                    Ok(PostSummaryRow {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        title: row.get(2)?,
                        author_name: row.get(3)?,
                        views: row.get(4)?,
                        created_at: row.get(5)?,
                        updated_at: row.get(6)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn insert_post(
        &self,
        user_id: &str,
        title: &str,
        content: &str,
        author_name: &str,
    ) -> Result<PostRow> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO posts (user_id, title, content, author_name) VALUES (?1, ?2, ?3, ?4)",
                (user_id, title, content, author_name),
            )?;
            let id = conn.last_insert_rowid();
            query_post(conn, id)?.ok_or_else(|| anyhow::anyhow!("Post {} vanished after insert", id))
        })
    }

    /// Bump the view counter and return the post as seen after the bump.
    pub fn view_post(&self, id: i64) -> Result<Option<PostRow>> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            tx.execute("UPDATE posts SET views = views + 1 WHERE id = ?1", [id])?;
            let post = query_post(&tx, id)?;
            tx.commit()?;
            Ok(post)
        })
    }

    pub fn update_post(
        &self,
        id: i64,
        user_id: &str,
        title: &str,
        content: &str,
    ) -> Result<OwnedChange<PostRow>> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            match query_post_owner(&tx, id)? {
                None => return Ok(OwnedChange::Missing),
                Some(owner) if owner != user_id => return Ok(OwnedChange::NotOwner),
                Some(_) => {}
            }

            tx.execute(
                "UPDATE posts SET title = ?1, content = ?2, updated_at = datetime('now') WHERE id = ?3",
                rusqlite::params![title, content, id],
            )?;
            let post = query_post(&tx, id)?;
            tx.commit()?;

            Ok(post.map(OwnedChange::Applied).unwrap_or(OwnedChange::Missing))
        })
    }

    pub fn delete_post(&self, id: i64, user_id: &str) -> Result<OwnedChange<()>> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            match query_post_owner(&tx, id)? {
                None => return Ok(OwnedChange::Missing),
                Some(owner) if owner != user_id => return Ok(OwnedChange::NotOwner),
                Some(_) => {}
            }

            tx.execute("DELETE FROM posts WHERE id = ?1", [id])?;
            tx.commit()?;
            Ok(OwnedChange::Applied(()))
        })
    }

    // -- Contact requests --

    pub fn count_requests(&self, status: Option<&str>) -> Result<u64> {
        self.with_conn(|conn| {
            let total: i64 = match status {
                Some(s) => conn.query_row(
                    "SELECT COUNT(*) FROM requests WHERE status = ?1",
                    [s],
                    |r| r.get(0),
                )?,
                None => conn.query_row("SELECT COUNT(*) FROM requests", [], |r| r.get(0))?,
            };
            Ok(total as u64)
        })
    }

    pub fn list_requests(&self, status: Option<&str>, limit: u32, offset: u64) -> Result<Vec<RequestRow>> {
        self.with_conn(|conn| {
            let rows = match status {
                Some(s) => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {REQUEST_COLUMNS} FROM requests WHERE status = ?1
                         ORDER BY created_at DESC, id DESC LIMIT ?2 OFFSET ?3"
                    ))?;
                    stmt.query_map(rusqlite::params![s, limit, offset as i64], request_from_row)?
                        .collect::<std::result::Result<Vec<_>, _>>()?
                }
                None => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {REQUEST_COLUMNS} FROM requests
                         ORDER BY created_at DESC, id DESC LIMIT ?1 OFFSET ?2"
                    ))?;
                    stmt.query_map(rusqlite::params![limit, offset as i64], request_from_row)?
                        .collect::<std::result::Result<Vec<_>, _>>()?
                }
            };
            Ok(rows)
        })
    }

    pub fn insert_request(&self, name: &str, email: &str, subject: &str, message: &str) -> Result<RequestRow> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO requests (name, email, subject, message) VALUES (?1, ?2, ?3, ?4)",
                (name, email, subject, message),
            )?;
            let id = conn.last_insert_rowid();
            let row = conn.query_row(
                &format!("SELECT {REQUEST_COLUMNS} FROM requests WHERE id = ?1"),
                [id],
                request_from_row,
            )?;
            Ok(row)
        })
    }

    // -- Calculator stats --

    pub fn list_calculator_stats(&self) -> Result<Vec<CalculatorStatRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {STAT_COLUMNS} FROM calculator_stats ORDER BY click_count DESC, name ASC"
            ))?;
            let rows = stmt
                .query_map([], stat_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Count one click. `None` when the calculator id is not registered.
    pub fn record_click(&self, calculator_id: &str) -> Result<Option<CalculatorStatRow>> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let changed = tx.execute(
                "UPDATE calculator_stats
                 SET click_count = click_count + 1,
                     last_clicked_at = datetime('now'),
                     updated_at = datetime('now')
                 WHERE id = ?1",
                [calculator_id],
            )?;
            if changed == 0 {
                return Ok(None);
            }

            let row = tx.query_row(
                &format!("SELECT {STAT_COLUMNS} FROM calculator_stats WHERE id = ?1"),
                [calculator_id],
                stat_from_row,
            )?;
            tx.commit()?;
            Ok(Some(row))
        })
    }
}

fn query_post(conn: &Connection, id: i64) -> Result<Option<PostRow>> {
    let row = conn
        .query_row(&format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?1"), [id], |row| {
            Ok(PostRow {
                id: row.get(0)?,
                user_id: row.get(1)?,
                title: row.get(2)?,
                content: row.get(3)?,
                author_name: row.get(4)?,
                views: row.get(5)?,
                created_at: row.get(6)?,
                updated_at: row.get(7)?,
            })
        })
        .optional()?;
    Ok(row)
}

fn query_post_owner(conn: &Connection, id: i64) -> Result<Option<String>> {
    let owner = conn
        .query_row("SELECT user_id FROM posts WHERE id = ?1", [id], |row| row.get(0))
        .optional()?;
    Ok(owner)
}

fn dday_from_row(row: &Row<'_>) -> rusqlite::Result<DdayRow> {
    Ok(DdayRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        target_date: row.get(3)?,
        goal_amount: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

fn request_from_row(row: &Row<'_>) -> rusqlite::Result<RequestRow> {
    Ok(RequestRow {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        subject: row.get(3)?,
        message: row.get(4)?,
        status: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn stat_from_row(row: &Row<'_>) -> rusqlite::Result<CalculatorStatRow> {
    Ok(CalculatorStatRow {
        id: row.get(0)?,
        name: row.get(1)?,
        icon: row.get(2)?,
        click_count: row.get(3)?,
        last_clicked_at: row.get(4)?,
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
