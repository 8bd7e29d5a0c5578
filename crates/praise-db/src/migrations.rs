use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 =
        conn.query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))?;

    if version < 1 {
        info!("Running migration v1 (teachers, praise_messages)");
        conn.execute_batch(
            "
            CREATE TABLE teachers (
                id              TEXT PRIMARY KEY,
                username        TEXT NOT NULL UNIQUE,
                full_name       TEXT NOT NULL,
                subject         TEXT NOT NULL,
                password_hash   TEXT NOT NULL,
                role            TEXT NOT NULL DEFAULT 'teacher'
                                CHECK (role IN ('teacher', 'admin'))
            );

            CREATE TABLE praise_messages (
                id              TEXT PRIMARY KEY,
                teacher_id      TEXT NOT NULL REFERENCES teachers(id) ON DELETE CASCADE,
                message         TEXT NOT NULL,
                is_anonymous    INTEGER NOT NULL DEFAULT 1,
                user_name       TEXT,
                created_at      TEXT NOT NULL,
                CHECK (is_anonymous = 0 OR user_name IS NULL)
            );

            CREATE INDEX idx_praise_teacher
                ON praise_messages(teacher_id, created_at);

            CREATE INDEX idx_praise_created
                ON praise_messages(created_at);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
