use crate::Database;
use crate::models::{PraiseDetailRow, PraiseRow, SeedTeacher, StatsRow, TeacherRow};
use anyhow::Result;
use praise_types::models::Role;
use praise_types::validation::NewPraise;
use rusqlite::types::Type;
use rusqlite::{Connection, Row};
use tracing::info;

const TEACHER_COLUMNS: &str = "id, username, full_name, subject, password_hash, role";

impl Database {
    // -- Teachers --

    pub fn count_teachers(&self) -> Result<i64> {
        self.with_conn(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM teachers", [], |r| r.get(0))?))
    }

    pub fn list_teachers(&self) -> Result<Vec<TeacherRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {TEACHER_COLUMNS} FROM teachers ORDER BY full_name, username"
            ))?;
            let rows = stmt
                .query_map([], map_teacher)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_teacher_by_id(&self, id: &str) -> Result<Option<TeacherRow>> {
        self.with_conn(|conn| query_teacher(conn, "id", id))
    }

    pub fn get_teacher_by_username(&self, username: &str) -> Result<Option<TeacherRow>> {
        self.with_conn(|conn| query_teacher(conn, "username", username))
    }

    /// Insert a teacher. Returns `None` when the username is already taken.
    pub fn create_teacher(
        &self,
        id: &str,
        username: &str,
        full_name: &str,
        subject: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<Option<TeacherRow>> {
        self.with_tx(|tx| {
            if query_teacher(tx, "username", username)?.is_some() {
                return Ok(None);
            }
            tx.execute(
                "INSERT INTO teachers (id, username, full_name, subject, password_hash, role)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                (id, username, full_name, subject, password_hash, role.as_str()),
            )?;
            query_teacher(tx, "id", id)
        })
    }

    /// Apply the given field changes. Returns `None` when no such teacher exists.
    pub fn update_teacher(
        &self,
        id: &str,
        full_name: Option<&str>,
        subject: Option<&str>,
        password_hash: Option<&str>,
    ) -> Result<Option<TeacherRow>> {
        self.with_tx(|tx| {
            if query_teacher(tx, "id", id)?.is_none() {
                return Ok(None);
            }
            tx.execute(
                "UPDATE teachers SET
                    full_name = COALESCE(?2, full_name),
                    subject = COALESCE(?3, subject),
                    password_hash = COALESCE(?4, password_hash)
                 WHERE id = ?1",
                (id, full_name, subject, password_hash),
            )?;
            query_teacher(tx, "id", id)
        })
    }

    /// Delete a teacher together with every praise addressed to them.
    /// Returns the number of praise rows removed, or `None` when no such teacher exists.
    pub fn delete_teacher(&self, id: &str) -> Result<Option<usize>> {
        self.with_tx(|tx| {
            if query_teacher(tx, "id", id)?.is_none() {
                return Ok(None);
            }
            let praises = tx.execute("DELETE FROM praise_messages WHERE teacher_id = ?1", [id])?;
            tx.execute("DELETE FROM teachers WHERE id = ?1", [id])?;
            Ok(Some(praises))
        })
    }

    /// Insert the seed accounts, but only into an empty table.
    /// Returns how many accounts were inserted.
    pub fn seed_teachers(&self, seeds: &[SeedTeacher]) -> Result<usize> {
        self.with_tx(|tx| {
            let existing: i64 = tx.query_row("SELECT COUNT(*) FROM teachers", [], |r| r.get(0))?;
            if existing > 0 {
                return Ok(0);
            }
            for seed in seeds {
                tx.execute(
                    "INSERT INTO teachers (id, username, full_name, subject, password_hash, role)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    (
                        uuid::Uuid::new_v4().to_string(),
                        &seed.username,
                        &seed.full_name,
                        &seed.subject,
                        &seed.password_hash,
                        seed.role.as_str(),
                    ),
                )?;
            }
            info!("Seeded {} accounts", seeds.len());
            Ok(seeds.len())
        })
    }

    // -- Praise --

    /// Insert a praise message. Returns `false` when the recipient does not exist.
    pub fn insert_praise(&self, id: &str, praise: &NewPraise, created_at: &str) -> Result<bool> {
        self.with_tx(|tx| {
            if query_teacher(tx, "id", &praise.teacher_id)?.is_none() {
                return Ok(false);
            }
            tx.execute(
                "INSERT INTO praise_messages (id, teacher_id, message, is_anonymous, user_name, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    id,
                    &praise.teacher_id,
                    &praise.message,
                    praise.is_anonymous,
                    &praise.user_name,
                    created_at,
                ],
            )?;
            Ok(true)
        })
    }

    /// Messages addressed to one teacher, newest first.
    pub fn get_praises_for_teacher(&self, teacher_id: &str) -> Result<Vec<PraiseRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, teacher_id, message, is_anonymous, user_name, created_at
                 FROM praise_messages
                 WHERE teacher_id = ?1
                 ORDER BY created_at DESC, rowid DESC",
            )?;
            let rows = stmt
                .query_map([teacher_id], map_praise)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// All messages joined with their recipient, newest first.
    pub fn list_praises(&self, limit: u32, offset: u32) -> Result<Vec<PraiseDetailRow>> {
        self.with_conn(|conn| {
            // JOIN teachers to fetch the recipient in a single query
            let mut stmt = conn.prepare(
                "SELECT p.id, p.teacher_id, p.message, p.is_anonymous, p.user_name, p.created_at,
                        t.full_name, t.subject
                 FROM praise_messages p
                 JOIN teachers t ON p.teacher_id = t.id
                 ORDER BY p.created_at DESC, p.rowid DESC
                 LIMIT ?1 OFFSET ?2",
            )?;
            let rows = stmt
                .query_map(rusqlite::params![limit, offset], |row| {
                    Ok(PraiseDetailRow {
                        praise: map_praise(row)?,
                        teacher_full_name: row.get(6)?,
                        teacher_subject: row.get(7)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn delete_praise(&self, id: &str) -> Result<bool> {
        self.with_tx(|tx| {
            let removed = tx.execute("DELETE FROM praise_messages WHERE id = ?1", [id])?;
            Ok(removed > 0)
        })
    }

    /// Totals plus the number of messages created at or after `since`.
    pub fn stats(&self, since: &str) -> Result<StatsRow> {
        self.with_conn(|conn| {
            let stats = conn.query_row(
                "SELECT
                    (SELECT COUNT(*) FROM teachers),
                    (SELECT COUNT(*) FROM praise_messages),
                    (SELECT COUNT(*) FROM praise_messages WHERE created_at >= ?1)",
                [since],
                |r| {
                    Ok(StatsRow {
                        total_teachers: r.get(0)?,
                        total_praises: r.get(1)?,
                        praises_since: r.get(2)?,
                    })
                },
            )?;
            Ok(stats)
        })
    }
}

fn query_teacher(conn: &Connection, column: &str, value: &str) -> Result<Option<TeacherRow>> {
    debug_assert!(column == "id" || column == "username");
    let mut stmt = conn.prepare(&format!(
        "SELECT {TEACHER_COLUMNS} FROM teachers WHERE {column} = ?1"
    ))?;

    let row = stmt.query_row([value], map_teacher).optional()?;

    Ok(row)
}

fn map_teacher(row: &Row<'_>) -> rusqlite::Result<TeacherRow> {
    let role: String = row.get(5)?;
    let role = role
        .parse::<Role>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, e.into()))?;

    Ok(TeacherRow {
        id: row.get(0)?,
        username: row.get(1)?,
        full_name: row.get(2)?,
        subject: row.get(3)?,
        password_hash: row.get(4)?,
        role,
    })
}

fn map_praise(row: &Row<'_>) -> rusqlite::Result<PraiseRow> {
    Ok(PraiseRow {
        id: row.get(0)?,
        teacher_id: row.get(1)?,
        message: row.get(2)?,
        is_anonymous: row.get(3)?,
        user_name: row.get(4)?,
        created_at: row.get(5)?,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::format_timestamp;
    use chrono::{Duration, Utc};

    fn db_with_teacher(username: &str) -> (Database, String) {
        let db = Database::open_in_memory().unwrap();
        let id = uuid::Uuid::new_v4().to_string();
        db.create_teacher(&id, username, "Карелина Наталья", "Математика", "hash", Role::Teacher)
            .unwrap()
            .unwrap();
        (db, id)
    }

    fn praise(teacher_id: &str, message: &str) -> NewPraise {
        NewPraise {
            teacher_id: teacher_id.to_string(),
            message: message.to_string(),
            is_anonymous: true,
            user_name: None,
        }
    }

    #[test]
    fn duplicate_username_is_rejected() {
        let (db, _) = db_with_teacher("Karelina");
        let dup = db
            .create_teacher("other-id", "Karelina", "Someone Else", "Физика", "hash", Role::Admin)
            .unwrap();
        assert!(dup.is_none());
        assert_eq!(db.count_teachers().unwrap(), 1);
    }

    #[test]
    fn praise_requires_existing_teacher() {
        let db = Database::open_in_memory().unwrap();
        let inserted = db
            .insert_praise("p1", &praise("missing", "Thank you!"), &format_timestamp(Utc::now()))
            .unwrap();
        assert!(!inserted);
        assert_eq!(db.stats("").unwrap().total_praises, 0);
    }

    #[test]
    fn praises_are_listed_newest_first() {
        let (db, id) = db_with_teacher("Karelina");
        let now = Utc::now();
        db.insert_praise("old", &praise(&id, "First thanks"), &format_timestamp(now - Duration::days(1)))
            .unwrap();
        db.insert_praise("new", &praise(&id, "Second thanks"), &format_timestamp(now))
            .unwrap();

        let ids: Vec<_> = db
            .get_praises_for_teacher(&id)
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, ["new", "old"]);

        let detailed = db.list_praises(10, 0).unwrap();
        assert_eq!(detailed[0].praise.id, "new");
        assert_eq!(detailed[0].teacher_subject, "Математика");

        let page = db.list_praises(1, 1).unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].praise.id, "old");
    }

    #[test]
    fn deleting_teacher_cascades_to_praises() {
        let (db, id) = db_with_teacher("Karelina");
        let other = uuid::Uuid::new_v4().to_string();
        db.create_teacher(&other, "gordeev", "Гордеев Дмитрий", "Физика", "hash", Role::Teacher)
            .unwrap();
        let ts = format_timestamp(Utc::now());
        db.insert_praise("a", &praise(&id, "Thanks a lot"), &ts).unwrap();
        db.insert_praise("b", &praise(&id, "Thanks again"), &ts).unwrap();
        db.insert_praise("c", &praise(&other, "Great physics"), &ts).unwrap();

        assert_eq!(db.delete_teacher(&id).unwrap(), Some(2));
        assert!(db.get_teacher_by_id(&id).unwrap().is_none());
        let remaining = db.list_praises(100, 0).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].praise.teacher_id, other);

        assert_eq!(db.delete_teacher(&id).unwrap(), None);
    }

    #[test]
    fn update_keeps_unspecified_fields() {
        let (db, id) = db_with_teacher("Karelina");
        let updated = db
            .update_teacher(&id, None, Some("Алгебра"), None)
            .unwrap()
            .unwrap();
        assert_eq!(updated.subject, "Алгебра");
        assert_eq!(updated.full_name, "Карелина Наталья");
        assert_eq!(updated.password_hash, "hash");

        assert!(db.update_teacher("nope", Some("Name Name"), None, None).unwrap().is_none());
    }

    #[test]
    fn failed_transaction_leaves_no_rows() {
        let db = Database::open_in_memory().unwrap();
        let result: Result<()> = db.with_tx(|tx| {
            tx.execute(
                "INSERT INTO teachers (id, username, full_name, subject, password_hash)
                 VALUES ('t1', 'someone', 'Some One', 'Art', 'hash')",
                [],
            )?;
            anyhow::bail!("boom")
        });
        assert!(result.is_err());
        assert_eq!(db.count_teachers().unwrap(), 0);
    }

    #[test]
    fn seeding_only_fills_an_empty_table() {
        let db = Database::open_in_memory().unwrap();
        let seeds = vec![SeedTeacher {
            username: "admin".into(),
            full_name: "Administrator".into(),
            subject: "Администрация".into(),
            password_hash: "hash".into(),
            role: Role::Admin,
        }];
        assert_eq!(db.seed_teachers(&seeds).unwrap(), 1);
        assert_eq!(db.seed_teachers(&seeds).unwrap(), 0);
        let admin = db.get_teacher_by_username("admin").unwrap().unwrap();
        assert_eq!(admin.role, Role::Admin);
    }

    #[test]
    fn stats_count_recent_praises() {
        let (db, id) = db_with_teacher("Karelina");
        let now = Utc::now();
        db.insert_praise("old", &praise(&id, "Long ago thanks"), &format_timestamp(now - Duration::days(30)))
            .unwrap();
        db.insert_praise("new", &praise(&id, "Fresh thanks"), &format_timestamp(now))
            .unwrap();

        let stats = db.stats(&format_timestamp(now - Duration::days(7))).unwrap();
        assert_eq!(
            stats,
            StatsRow { total_teachers: 1, total_praises: 2, praises_since: 1 }
        );
    }
}
