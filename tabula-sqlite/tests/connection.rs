#[cfg(test)]
mod tests {
    use std::{fs, path::Path, sync::Mutex};
    use tabula_core::{Connection, GeneratedKeys, Prepared, Value};
    use tabula_sqlite::SqliteConnection;
    use tabula_tests::{init_logs, silent_logs};

    static MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn create_database() {
        init_logs();
        const DB_PATH: &'static str = "../target/debug/creation.sqlite";
        let _guard = MUTEX.lock().unwrap();
        if let Some(parent) = Path::new(DB_PATH).parent() {
            fs::create_dir_all(parent).expect("Could not create the target directory");
        }
        if Path::new(DB_PATH).exists() {
            fs::remove_file(DB_PATH)
                .expect(format!("Failed to remove test database file {}", DB_PATH).as_str());
        }
        assert!(
            !Path::new(DB_PATH).exists(),
            "Database file should not exist before test"
        );
        SqliteConnection::connect(&format!("sqlite://{}?mode=rwc", DB_PATH))
            .expect("Could not open the database");
        assert!(
            Path::new(DB_PATH).exists(),
            "Database file should be created after connection"
        );
        SqliteConnection::connect(&format!("sqlite://{}?mode=ro", DB_PATH))
            .expect("Could not open the database");
        fs::remove_file(DB_PATH)
            .expect(format!("Failed to remove existing test database file {}", DB_PATH).as_str());
        silent_logs! {
            assert!(
                SqliteConnection::connect(&format!("sqlite://{}?mode=ro", DB_PATH)).is_err(),
                "Should not be able to open in read only unexisting database"
            );
        }
    }

    #[test]
    fn wrong_url() {
        silent_logs! {
            assert!(SqliteConnection::connect("duckdb://some_value").is_err());
        }
    }

    #[test]
    fn memory_statements() {
        init_logs();
        let mut connection =
            SqliteConnection::connect("sqlite://:memory:").expect("Could not open the database");
        connection
            .execute_batch(
                "CREATE TABLE notes (id INTEGER PRIMARY KEY AUTOINCREMENT, body TEXT, weight REAL);
                INSERT INTO notes (body, weight) VALUES ('first', 1.5);",
            )
            .expect("Could not run the batch");

        let mut statement = connection
            .prepare(
                "INSERT INTO notes (body, weight) VALUES (?, ?)",
                GeneratedKeys::Returned("id"),
            )
            .expect("Could not prepare the insert");
        statement
            .bind_index(Value::from("second"), 1)
            .and_then(|v| v.bind_index(Value::Float32(Some(2.0)), 2))
            .expect("Could not bind");
        let affected = statement.execute().expect("Could not insert");
        assert_eq!(affected.rows_affected, 1);
        let keys = statement
            .generated_keys()
            .expect("Could not read the generated key")
            .expect("The key was requested");
        assert_eq!(keys.get_column("id"), Some(&Value::Int64(Some(2))));
        drop(statement);

        let mut statement = connection
            .prepare(
                "SELECT id, body, weight FROM notes WHERE id >= ? ORDER BY id",
                GeneratedKeys::None,
            )
            .expect("Could not prepare the select");
        statement
            .bind_index(Value::Int32(Some(1)), 1)
            .expect("Could not bind");
        let rows = statement
            .query()
            .expect("Could not query")
            .collect::<Result<Vec<_>, _>>()
            .expect("Could not read the rows");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].names(), ["id", "body", "weight"]);
        assert_eq!(rows[0].values[1], Value::Varchar(Some("first".into())));
        assert_eq!(rows[1].values[2], Value::Float64(Some(2.0)));
        drop(statement);

        silent_logs! {
            assert!(connection.prepare("SELECT * FROM missing", GeneratedKeys::None).is_err());
            assert!(connection.prepare("SELECT 1; SELECT 2", GeneratedKeys::None).is_err());
            assert!(connection.execute_batch("NOT SQL").is_err());
        }
        assert_eq!(
            connection.run("DELETE FROM notes").expect("Could not delete").rows_affected,
            2
        );
    }
}
