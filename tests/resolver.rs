mod resource {
    pub mod library;
}

#[cfg(test)]
mod tests {
    use crate::resource::library::{Account, Book, Loose};
    use indoc::indoc;
    use tabula::{
        Entity, Fault, accessors,
        resolver::{reader_name, resolve, writer_name},
    };

    #[test]
    fn test_conventional_names() {
        let fields = Book::fields();
        assert_eq!(reader_name(&fields[1]), "get_title");
        assert_eq!(writer_name(&fields[1]), "set_title");
        assert_eq!(reader_name(&fields[2]), "get_pages");
        assert_eq!(reader_name(&fields[4]), "is_available");
        assert_eq!(writer_name(&fields[4]), "set_available");

        let fields = Account::fields();
        assert_eq!(reader_name(&fields[0]), "get_id");
        assert_eq!(writer_name(&fields[0]), "set_id");
    }

    #[test]
    fn test_resolve_book() {
        let resolution = resolve::<Book>().unwrap();
        let schema = &resolution.schema;

        assert!(resolution.faults.is_empty());
        assert_eq!(schema.table(), "books");
        assert_eq!(schema.len(), 6);
        assert_eq!(schema.readable().len(), 6);
        assert_eq!(schema.writable().len(), 6);
        assert_eq!(
            schema
                .persist_writable()
                .attributes()
                .iter()
                .map(|v| v.name())
                .collect::<Vec<_>>(),
            ["title", "page_count", "rating", "available", "subtitle"]
        );
        assert_eq!(schema.primary_key_index(), Some(0));
        assert!(schema.has_valid_primary_key());
        assert_eq!(
            schema.get("page_count").and_then(|v| v.reader).map(|v| v.name),
            Some("get_pages")
        );
        assert_eq!(
            schema.get("available").and_then(|v| v.reader).map(|v| v.name),
            Some("is_available")
        );
        assert_eq!(resolution.fresh.map(|v| v.name), Some("blank"));
    }

    #[test]
    fn test_resolve_account() {
        let resolution = resolve::<Account>().unwrap();
        let schema = &resolution.schema;

        assert_eq!(
            resolution.faults,
            [Fault::UnresolvedAccessor {
                column: "owner".into(),
                accessor: "reader",
            }]
        );
        assert!(resolution.fresh.is_none());
        assert_eq!(
            schema
                .readable()
                .attributes()
                .iter()
                .map(|v| v.name())
                .collect::<Vec<_>>(),
            ["account_id", "balance"]
        );
        assert_eq!(schema.writable().len(), 3);
        assert_eq!(
            schema.valid_primary_key().map(|v| v.name()),
            Some("account_id")
        );
        assert_eq!(
            schema.to_string().replace('\t', "    "),
            indoc! {r#"
                Table "accounts"
                    column: account_id, field: _id, reader: identifier, writer: assign, primary key: true
                    column: owner, field: owner, reader: null, writer: set_owner, primary key: false
                    column: balance, field: balance, reader: get_balance, writer: set_balance, primary key: false
            "#}
            .trim_end()
        );
    }

    #[test]
    fn test_display_unreadable_key() {
        let mut schema = resolve::<Book>().unwrap().schema;
        let key = &mut schema.attributes_mut()[0];
        assert_eq!(
            key.to_string(),
            "column: id, field: id, reader: get_id, writer: set_id, primary key: true"
        );
        key.reader = None;
        assert!(key.is_primary_key());
        assert_eq!(
            key.to_string(),
            "column: id, field: id, reader: null, writer: set_id, primary key: false"
        );
    }

    #[test]
    fn test_not_an_entity() {
        let error = resolve::<Loose>().unwrap_err();
        assert!(matches!(
            error.downcast_ref::<Fault>(),
            Some(Fault::NotAnEntity { .. })
        ));
    }

    #[test]
    fn test_duplicate_columns() {
        #[derive(Entity, Default)]
        #[tabula(table = "twins")]
        struct Twin {
            #[tabula(column = "code", primary_key)]
            first: i32,
            #[tabula(column = "code")]
            second: i32,
            #[tabula(column)]
            label: String,
        }

        #[accessors]
        impl Twin {
            fn get_first(&self) -> i32 {
                self.first
            }
            fn get_second(&self) -> i32 {
                self.second
            }
            fn get_label(&self) -> String {
                self.label.clone()
            }
        }

        let resolution = resolve::<Twin>().unwrap();
        let schema = &resolution.schema;

        assert_eq!(schema.len(), 2);
        assert_eq!(schema.attributes()[0].field().ident, "first");
        assert_eq!(schema.attributes()[1].name(), "label");
        assert!(resolution.faults.contains(&Fault::DuplicateColumn {
            table: "twins".into(),
            column: "code".into(),
        }));
        assert!(schema.writable().is_empty());
    }

    #[test]
    fn test_explicit_binding_priority() {
        #[derive(Entity, Default)]
        #[tabula(table = "meters")]
        struct Meter {
            #[tabula(column, primary_key)]
            serial: i64,
            #[tabula(column)]
            reading: f64,
            #[tabula(column)]
            unit: String,
        }

        #[accessors]
        impl Meter {
            fn get_serial(&self) -> i64 {
                self.serial
            }
            /// Bound explicitly but with the wrong type, the conventional reader is not used.
            #[tabula(reader = "serial")]
            fn serial_text(&self) -> String {
                self.serial.to_string()
            }
            #[tabula(reader = "reading")]
            fn measured(&self) -> f64 {
                self.reading
            }
            #[tabula(reader = "reading")]
            fn measured_again(&self) -> f64 {
                self.reading
            }
            fn get_reading(&self) -> f64 {
                self.reading
            }
            #[tabula(writer = "unit")]
            fn change_unit(&mut self, unit: String) {
                self.unit = unit;
            }
            fn get_unit(&self) -> String {
                self.unit.clone()
            }
            #[tabula(fresh)]
            fn zero() -> Self {
                Self::default()
            }
            #[tabula(fresh)]
            fn other() -> Self {
                Self::default()
            }
        }

        let resolution = resolve::<Meter>().unwrap();
        let schema = &resolution.schema;

        assert!(schema.get("serial").unwrap().reader.is_none());
        assert!(!schema.has_valid_primary_key());
        assert_eq!(
            schema.get("reading").and_then(|v| v.reader).map(|v| v.name),
            Some("get_reading")
        );
        assert_eq!(
            schema.get("unit").and_then(|v| v.writer).map(|v| v.name),
            Some("change_unit")
        );
        assert_eq!(resolution.fresh.map(|v| v.name), Some("zero"));
        assert!(resolution.faults.contains(&Fault::UnresolvedAccessor {
            column: "serial".into(),
            accessor: "reader",
        }));
    }
}
