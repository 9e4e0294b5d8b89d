//! Migrations embedded at compile time with include_str!

pub struct Migration {
    pub id: &'static str,
    pub sql: &'static str,
}

/// All migrations, in apply order
pub fn get_migrations() -> Vec<Migration> {
    vec![Migration {
        id: "001_initial_schema",
        sql: include_str!("../../migrations/001_initial_schema.sql"),
    }]
}
