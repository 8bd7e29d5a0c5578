use anyhow::Result;
use tracing::info;

use praise_db::Database;
use praise_db::models::SeedTeacher;
use praise_types::models::Role;

use crate::password::Hasher;

pub struct SeedAccount {
    pub username: &'static str,
    pub full_name: &'static str,
    pub subject: &'static str,
    pub password: String,
    pub role: Role,
}

/// Accounts created on first start: one administrator plus the initial staff.
pub fn default_accounts(admin_password: &str) -> Vec<SeedAccount> {
    vec![
        SeedAccount {
            username: "admin",
            full_name: "Администратор школы",
            subject: "Администрация",
            password: admin_password.to_string(),
            role: Role::Admin,
        },
        teacher("Karelina", "Карелина Наталья Александровна", "Математика", "Kar_TuP5ul"),
        teacher("Chestnih", "Честных Евгения Ивановна", "Литература", "Che_L1tEra"),
        teacher("Gordeev", "Гордеев Дмитрий Александрович", "Физика", "Gor_Ph1sYk"),
    ]
}

fn teacher(
    username: &'static str,
    full_name: &'static str,
    subject: &'static str,
    password: &str,
) -> SeedAccount {
    SeedAccount {
        username,
        full_name,
        subject,
        password: password.to_string(),
        role: Role::Teacher,
    }
}

/// Insert `accounts` if, and only if, no teacher exists yet. Safe to call on every start.
pub fn seed(db: &Database, hasher: &Hasher, accounts: &[SeedAccount]) -> Result<usize> {
    if db.count_teachers()? > 0 {
        info!("Teachers already present, skipping seed");
        return Ok(0);
    }

    let seeds = accounts
        .iter()
        .map(|a| {
            Ok(SeedTeacher {
                username: a.username.to_string(),
                full_name: a.full_name.to_string(),
                subject: a.subject.to_string(),
                password_hash: hasher.hash(&a.password)?,
                role: a.role,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    db.seed_teachers(&seeds)
}
