use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use sqlx::Row;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

const CRM_SCHEMA: &str = include_str!("../../../resources/schema.sql");

const CRM_SCHEMA_VERSION: i32 = 2; // v2: AI columns on listings/offers

pub async fn init_crm_db(db_path: &Path) -> Result<(), String> {
    // PRAGMA user_version tracks the schema revision. Schema statements
    // are additive (CREATE IF NOT EXISTS + ensure_column), so upgrades
    // never rewrite existing data.
    let pool = connect_pool(db_path).await?;

    // If the DB is newer than this build expects, fail fast (safety).
    let effective_version = read_user_version(&pool).await?;
    if effective_version > CRM_SCHEMA_VERSION {
        return Err(format!(
            "CRM database schema too new: db user_version={} > app supported_version={}",
            effective_version, CRM_SCHEMA_VERSION
        ));
    }

    apply_schema(&pool).await?;
    set_user_version(&pool, CRM_SCHEMA_VERSION).await?;

    sqlx::query("SELECT 1")
        .execute(&pool)
        .await
        .map_err(|e| format!("CRM database health check failed: {e}"))?;

    Ok(())
}

pub(crate) fn db_path_to_url(db_path: &Path) -> Result<String, String> {
    let db_path_str = db_path
        .to_str()
        .ok_or_else(|| "CRM database path is not valid UTF-8".to_string())?;
    Ok(format!("sqlite://{}", db_path_str.replace('\\', "/")))
}

async fn apply_schema(pool: &SqlitePool) -> Result<(), String> {
    for stmt in split_sql_statements(CRM_SCHEMA) {
        let sql = stmt.trim();
        if sql.is_empty() {
            continue;
        }
        sqlx::query(sql)
            .execute(pool)
            .await
            .map_err(|e| format!("Failed to apply CRM schema statement: {e}"))?;
    }

    // Additive upgrades for databases created before the AI assists
    // landed (v1 -> v2).
    ensure_column(pool, "listings", "ai_score_json", "TEXT").await?;
    ensure_column(pool, "offers", "ai_summary", "TEXT").await?;

    Ok(())
}

async fn ensure_column(
    pool: &SqlitePool,
    table: &str,
    column: &str,
    definition: &str,
) -> Result<(), String> {
    let pragma_query = format!("PRAGMA table_info({})", table);
    let rows = sqlx::query(&pragma_query)
        .fetch_all(pool)
        .await
        .map_err(|e| format!("Failed to inspect {table} schema: {e}"))?;

    let mut exists = false;
    for row in rows {
        let name: String = row
            .try_get("name")
            .map_err(|e| format!("Failed to read {table} schema: {e}"))?;
        if name == column {
            exists = true;
            break;
        }
    }

    if !exists {
        let alter_stmt = format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, definition);
        sqlx::query(&alter_stmt)
            .execute(pool)
            .await
            .map_err(|e| format!("Failed to add {column} column to {table}: {e}"))?;
    }

    Ok(())
}

async fn connect_pool(db_path: &Path) -> Result<SqlitePool, String> {
    let db_url = db_path_to_url(db_path)?;
    let options = SqliteConnectOptions::from_str(&db_url)
        .map_err(|e| format!("Failed to parse CRM database URL: {e}"))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(Duration::from_secs(5));

    SqlitePoolOptions::new()
        .max_connections(4)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(options)
        .await
        .map_err(|e| format!("Failed to connect to CRM database: {e}"))
}

async fn read_user_version(pool: &SqlitePool) -> Result<i32, String> {
    let version: i32 = sqlx::query_scalar("PRAGMA user_version")
        .fetch_one(pool)
        .await
        .map_err(|e| format!("Failed to read PRAGMA user_version: {e}"))?;
    Ok(version)
}

async fn set_user_version(pool: &SqlitePool, version: i32) -> Result<(), String> {
    let sql = format!("PRAGMA user_version = {}", version);
    sqlx::query(&sql)
        .execute(pool)
        .await
        .map_err(|e| format!("Failed to set PRAGMA user_version: {e}"))?;
    Ok(())
}

/// The schema carries no triggers, so a comment-aware split on `;` is
/// enough here.
fn split_sql_statements(sql: &str) -> Vec<String> {
    sql.split(';')
        .map(strip_sql_comments)
        .filter(|stmt| !stmt.trim().is_empty())
        .collect()
}

fn strip_sql_comments(stmt: &str) -> String {
    stmt.lines()
        .filter(|line| !line.trim_start().starts_with("--"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splitter_drops_comment_only_fragments() {
        let stmts = split_sql_statements("-- header\nCREATE TABLE a (id TEXT);\n-- trailing\n");
        assert_eq!(stmts.len(), 1);
        assert!(stmts[0].contains("CREATE TABLE a"));
    }

    #[test]
    fn schema_parses_into_statements() {
        assert!(split_sql_statements(CRM_SCHEMA).len() > 10);
    }
}
