/// Database row types. These map directly to SQLite rows.
/// Distinct from gyemini-types API models to keep the DB layer independent.

#[derive(Debug, Clone, PartialEq)]
pub struct DdayRow {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub target_date: String,
    pub goal_amount: Option<f64>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostRow {
    pub id: i64,
    pub user_id: String,
    pub title: String,
    pub content: String,
    pub author_name: String,
    pub views: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostSummaryRow {
    pub id: i64,
    pub user_id: String,
    pub title: String,
    pub author_name: String,
    pub views: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequestRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub status: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalculatorStatRow {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub click_count: i64,
    pub last_clicked_at: Option<String>,
}

/// Outcome of a write that is only allowed for the row's owner.
#[derive(Debug, PartialEq)]
pub enum OwnedChange<T> {
    Missing,
    NotOwner,
    Applied(T),
}
