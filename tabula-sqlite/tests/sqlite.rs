#[cfg(test)]
mod tests {
    use std::{fs, path::PathBuf, sync::Mutex};
    use tabula_core::Connection;
    use tabula_sqlite::SqliteConnection;
    use tabula_tests::{execute_tests, init_logs};

    static MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn sqlite() {
        init_logs();
        let _guard = MUTEX.lock().unwrap();
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../target/debug/tests.sqlite");
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Could not create the target directory");
        }
        if path.exists() {
            fs::remove_file(&path).expect(
                format!("Failed to remove test database file {}", path.display()).as_str(),
            );
        }
        let url = format!("sqlite://{}?mode=rwc", path.display());
        let connection = SqliteConnection::connect(&url).expect("Could not open the database");
        execute_tests(connection);
        let connection =
            SqliteConnection::connect("sqlite://:memory:").expect("Could not open the database");
        execute_tests(connection);
    }
}
