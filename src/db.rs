// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.alphavelocity", "Billbook", "billbook"));

/// Collection keys. One JSON document per key.
pub const KEY_SESSION: &str = "session";
pub const KEY_ACCOUNTS: &str = "accounts";
pub const KEY_ASSETS: &str = "assets";
pub const KEY_CATEGORIES: &str = "categories";
pub const KEY_BILLS: &str = "bills";

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("billbook.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    open_at(&path)
}

pub fn open_at(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Create data dir {}", parent.display()))?;
        }
    }
    let conn =
        Connection::open(path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS kv(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    "#,
    )
}

/// Raw JSON text stored under `key`, if any.
pub fn get_raw(conn: &Connection, key: &str) -> rusqlite::Result<Option<String>> {
    conn.query_row("SELECT value FROM kv WHERE key=?1", params![key], |r| {
        r.get(0)
    })
    .optional()
}

pub fn put_raw(conn: &Connection, key: &str, value: &str) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO kv(key, value, updated_at) VALUES (?1, ?2, datetime('now'))
         ON CONFLICT(key) DO UPDATE SET value=excluded.value, updated_at=excluded.updated_at",
        params![key, value],
    )?;
    Ok(())
}

pub fn remove_key(conn: &Connection, key: &str) -> rusqlite::Result<()> {
    conn.execute("DELETE FROM kv WHERE key=?1", params![key])?;
    Ok(())
}

/// Whole collection under `key`; a missing key reads as empty.
pub fn load_collection<T: DeserializeOwned>(
    conn: &Connection,
    key: &str,
) -> crate::error::Result<Vec<T>> {
    match get_raw(conn, key)? {
        Some(s) => Ok(serde_json::from_str(&s)?),
        None => Ok(Vec::new()),
    }
}

pub fn save_collection<T: Serialize>(
    conn: &Connection,
    key: &str,
    items: &[T],
) -> crate::error::Result<()> {
    let s = serde_json::to_string(items)?;
    put_raw(conn, key, &s)?;
    Ok(())
}

pub fn load_record<T: DeserializeOwned>(
    conn: &Connection,
    key: &str,
) -> crate::error::Result<Option<T>> {
    match get_raw(conn, key)? {
        Some(s) => Ok(Some(serde_json::from_str(&s)?)),
        None => Ok(None),
    }
}

pub fn save_record<T: Serialize>(conn: &Connection, key: &str, v: &T) -> crate::error::Result<()> {
    let s = serde_json::to_string(v)?;
    put_raw(conn, key, &s)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_collection_reads_empty() {
        let conn = open_in_memory().unwrap();
        let v: Vec<String> = load_collection(&conn, "nothing").unwrap();
        assert!(v.is_empty());
    }

    #[test]
    fn put_overwrites_previous_value() {
        let conn = open_in_memory().unwrap();
        put_raw(&conn, "k", "[1]").unwrap();
        put_raw(&conn, "k", "[1,2]").unwrap();
        let v: Vec<i32> = load_collection(&conn, "k").unwrap();
        assert_eq!(v, vec![1, 2]);
        remove_key(&conn, "k").unwrap();
        assert!(get_raw(&conn, "k").unwrap().is_none());
    }
}
