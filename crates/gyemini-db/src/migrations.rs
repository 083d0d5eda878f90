use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn
        .query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        conn.execute_batch(
            "
            CREATE TABLE dday_favorites (
                id           TEXT PRIMARY KEY,
                user_id      TEXT NOT NULL,
                name         TEXT NOT NULL,
                target_date  TEXT NOT NULL,
                goal_amount  REAL,
                created_at   TEXT NOT NULL DEFAULT (datetime('now')),
                updated_at   TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX idx_dday_favorites_user
                ON dday_favorites(user_id, created_at);

            CREATE TABLE posts (
                id           INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id      TEXT NOT NULL,
                title        TEXT NOT NULL,
                content      TEXT NOT NULL,
                author_name  TEXT NOT NULL DEFAULT '익명',
                views        INTEGER NOT NULL DEFAULT 0,
                created_at   TEXT NOT NULL DEFAULT (datetime('now')),
                updated_at   TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX idx_posts_created ON posts(created_at);

            CREATE TABLE requests (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                name        TEXT NOT NULL,
                email       TEXT NOT NULL,
                subject     TEXT NOT NULL,
                message     TEXT NOT NULL,
                status      TEXT NOT NULL DEFAULT 'pending',
                created_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX idx_requests_status ON requests(status, created_at);

            CREATE TABLE calculator_stats (
                id               TEXT PRIMARY KEY,
                name             TEXT NOT NULL,
                icon             TEXT NOT NULL,
                click_count      INTEGER NOT NULL DEFAULT 0,
                last_clicked_at  TEXT,
                updated_at       TEXT NOT NULL DEFAULT (datetime('now'))
            );

            INSERT OR IGNORE INTO calculator_stats (id, name, icon) VALUES
                ('interest', '이자 계산기', '💰'),
                ('dday',     'D-day 계산기', '📅'),
                ('salary',   '연봉 계산기', '💵'),
                ('exchange', '환율 계산기', '💱'),
                ('unit',     '단위 변환기', '📏'),
                ('crypto',   '암호화 계산기', '🔐'),
                ('market',   '주요 지수', '📈'),
                ('ipo',      '공모주 일정', '🗓️');

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
