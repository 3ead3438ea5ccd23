mod resource {
    pub mod library;
}

#[cfg(test)]
mod tests {
    use crate::resource::library::{Account, Book};
    use tabula::{
        GenericSqlWriter, Schema, SqlWriter, build_delete, build_insert, build_select_all,
        build_select_by_key, build_update,
        resolver::resolve,
        writer::{Context, Fragment},
    };

    /// Double quoted identifiers and numbered placeholders.
    struct NumberedWriter;
    impl SqlWriter for NumberedWriter {
        fn write_identifier(&self, _context: &mut Context, out: &mut String, value: &str) {
            out.push('"');
            out.push_str(value);
            out.push('"');
        }

        fn write_placeholder(&self, context: &mut Context, out: &mut String) {
            context.counter += 1;
            out.push('$');
            out.push_str(&context.counter.to_string());
        }
    }

    fn books() -> Schema<Book> {
        resolve::<Book>().unwrap().schema
    }

    #[test]
    fn test_book_statements() {
        let schema = books();
        assert_eq!(
            build_insert(&schema),
            "INSERT INTO books (title, page_count, rating, available, subtitle) VALUES (?, ?, ?, ?, ?)"
        );
        assert_eq!(
            build_select_by_key(&schema),
            "SELECT id, title, page_count, rating, available, subtitle FROM books WHERE id = ?"
        );
        assert_eq!(build_select_all(&schema), "SELECT * FROM books");
        assert_eq!(
            build_update(&schema),
            "UPDATE books SET title = ?, page_count = ?, rating = ?, available = ?, subtitle = ? WHERE id = ?"
        );
        assert_eq!(build_delete(&schema), "DELETE FROM books WHERE id = ?");
    }

    #[test]
    fn test_partial_accessors() {
        let schema = resolve::<Account>().unwrap().schema;
        assert_eq!(
            build_insert(&schema),
            "INSERT INTO accounts (account_id, balance) VALUES (?, ?)"
        );
        assert_eq!(
            build_select_by_key(&schema),
            "SELECT account_id, balance FROM accounts WHERE account_id = ?"
        );
        assert_eq!(
            build_update(&schema),
            "UPDATE accounts SET account_id = ?, balance = ? WHERE account_id = ?"
        );
        assert_eq!(
            build_delete(&schema),
            "DELETE FROM accounts WHERE account_id = ?"
        );
    }

    #[test]
    fn test_custom_dialect() {
        let schema = books();
        let writer = NumberedWriter;
        assert_eq!(
            writer.sql_insert(&schema),
            r#"INSERT INTO "books" ("title", "page_count", "rating", "available", "subtitle") VALUES ($1, $2, $3, $4, $5)"#
        );
        assert_eq!(
            writer.sql_update(&schema),
            r#"UPDATE "books" SET "title" = $1, "page_count" = $2, "rating" = $3, "available" = $4, "subtitle" = $5 WHERE "id" = $6"#
        );
        assert_eq!(
            writer.sql_select_by_key(&schema),
            r#"SELECT "id", "title", "page_count", "rating", "available", "subtitle" FROM "books" WHERE "id" = $1"#
        );
        assert_eq!(
            writer.sql_delete(&schema),
            r#"DELETE FROM "books" WHERE "id" = $1"#
        );
    }

    #[test]
    fn test_primary_key_without_reader() {
        let mut schema = books();
        schema.attributes_mut()[0].reader = None;

        assert!(build_select_by_key(&schema).is_empty());
        assert!(build_select_all(&schema).is_empty());
        assert!(build_update(&schema).is_empty());
        assert!(build_delete(&schema).is_empty());
        // The auto generated key is never inserted
        assert!(build_insert(&schema).starts_with("INSERT INTO books (title,"));
    }

    #[test]
    fn test_primary_key_without_writer() {
        let mut schema = books();
        schema.attributes_mut()[0].writer = None;

        assert!(build_select_by_key(&schema).is_empty());
        assert_eq!(build_delete(&schema), "DELETE FROM books WHERE id = ?");
    }

    #[test]
    fn test_nothing_to_write() {
        let mut schema = books();
        for attribute in schema.attributes_mut().iter_mut().skip(1) {
            attribute.reader = None;
        }

        assert!(build_insert(&schema).is_empty());
        assert!(build_update(&schema).is_empty());
        assert_eq!(
            build_select_by_key(&schema),
            "SELECT id FROM books WHERE id = ?"
        );
        assert!(GenericSqlWriter::new().sql_insert(&Schema::<Book>::new("books")).is_empty());
    }

    #[test]
    fn test_renamed_attribute() {
        let mut schema = books();
        schema.attributes_mut()[1].set_name("headline");

        assert_eq!(build_delete(&schema), "DELETE FROM books WHERE id = ?");
        assert!(build_insert(&schema).starts_with("INSERT INTO books (headline, page_count"));
        assert!(schema.get("title").is_none());
        assert!(schema.get("headline").is_some());
    }

    #[test]
    fn test_context() {
        let mut context = Context::new(Fragment::SqlUpdateSet);
        context.counter = 2;
        {
            let mut updater = context.switch_fragment(Fragment::SqlUpdateWhere);
            assert_eq!(updater.current.fragment, Fragment::SqlUpdateWhere);
            updater.current.counter += 1;
        }
        assert_eq!(context.counter, 3);
        assert_eq!(context.fragment, Fragment::SqlUpdateSet);
    }
}
