//! Idempotent schema setup
//!
//! The base tables are kept in a single SQL script that is embedded into the binary.
//! Every statement is introduced by a header line like this:
//! ```text
//! --## menu items
//! ```
//! The header names the step for log output. All statements must be of the
//! `CREATE ... IF NOT EXISTS` kind, because the script runs on every new connection.
//!
//! Databases created by older releases lack some columns; those are added afterwards,
//! one `ALTER TABLE` at a time, ignoring columns that already exist.
use sqlx::SqliteConnection;

#[derive(Debug, PartialEq)]
pub struct SchemaStep {
    pub description: String,
    pub sql: String,
}

const COLUMN_MIGRATIONS: [&str; 9] = [
    "ALTER TABLE menu_categories ADD COLUMN name_en TEXT",
    "ALTER TABLE menu_categories ADD COLUMN description_en TEXT",
    "ALTER TABLE menu_categories ADD COLUMN name_fr TEXT",
    "ALTER TABLE menu_categories ADD COLUMN description_fr TEXT",
    "ALTER TABLE menu_items ADD COLUMN name_en TEXT",
    "ALTER TABLE menu_items ADD COLUMN description_en TEXT",
    "ALTER TABLE menu_items ADD COLUMN name_fr TEXT",
    "ALTER TABLE menu_items ADD COLUMN description_fr TEXT",
    "ALTER TABLE menu_items ADD COLUMN price REAL",
];

pub fn parse_schema_script(data: &str) -> Result<Vec<SchemaStep>, String> {
    let mut result: Vec<SchemaStep> = Vec::new();

    for line in data.lines() {
        if line.trim().is_empty() {
            continue;
        }

        if let Some(description) = line.strip_prefix("--##") {
            result.push(SchemaStep {
                description: description.trim().to_string(),
                sql: String::new(),
            });
            continue;
        }

        let step = match result.last_mut() {
            Some(v) => v,
            None => {
                // allow comments at beginning of file
                if line.starts_with("--") {
                    continue;
                }
                return Err(format!(
                    "schema script does not start with a step header, got: {}",
                    line
                ));
            }
        };
        step.sql.push_str(line);
        step.sql.push('\n');
    }

    Ok(result)
}

pub fn sqlite_schema() -> Result<Vec<SchemaStep>, String> {
    parse_schema_script(include_str!("./sql/schema.sqlite.sql"))
}

fn is_duplicate_column(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(e) => e.message().contains("duplicate column name"),
        _ => false,
    }
}

pub async fn ensure_schema(connection: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    let steps = sqlite_schema().map_err(|e| sqlx::Error::Configuration(e.into()))?;

    for step in steps.iter() {
        log::trace!("Ensure schema step: {}", step.description);
        sqlx::query(&step.sql).execute(&mut *connection).await?;
    }

    for statement in COLUMN_MIGRATIONS.iter() {
        match sqlx::query(statement).execute(&mut *connection).await {
            Ok(_) => log::info!("Applied column migration: {}", statement),
            Err(e) if is_duplicate_column(&e) => {}
            Err(e) => return Err(e),
        }
    }

    Ok(())
}
