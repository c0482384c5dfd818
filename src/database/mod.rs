// Copyright 2023 Remi Bernotavicius

use crate::{Error, Result};
use diesel::connection::SimpleConnection as _;
use diesel::prelude::Connection as _;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::path::Path;

pub mod models;
pub mod schema;

pub type Connection = diesel::sqlite::SqliteConnection;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

pub fn establish_connection(path: impl AsRef<Path>) -> Result<Connection> {
    let mut connection = Connection::establish(path.as_ref().to_str().unwrap())?;
    connection.batch_execute("PRAGMA foreign_keys = ON;")?;
    connection
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| Error::Migration(e.to_string()))?;
    Ok(connection)
}

#[test]
fn migrations() {
    let mut conn = establish_connection(":memory:").unwrap();
    assert!(!conn.has_pending_migration(MIGRATIONS).unwrap());

    conn.revert_all_migrations(MIGRATIONS).unwrap();
    assert!(conn.has_pending_migration(MIGRATIONS).unwrap());

    conn.run_pending_migrations(MIGRATIONS).unwrap();
    assert!(!conn.has_pending_migration(MIGRATIONS).unwrap());
}
