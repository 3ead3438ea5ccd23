use crate::decode_column::{ColumnMetadata, decode_column};
use convert_case::{Case, Casing};
use syn::{Fields, ItemStruct, LitStr, parse::ParseBuffer};

pub(crate) struct TableMetadata {
    pub(crate) item: ItemStruct,
    /// `None` when the struct does not declare a table.
    pub(crate) name: Option<String>,
    pub(crate) columns: Vec<ColumnMetadata>,
}

pub(crate) fn decode_table(item: ItemStruct) -> TableMetadata {
    if !item.generics.params.is_empty() {
        panic!(
            "Entity `{}` cannot be generic, the derive emits static tables",
            item.ident
        );
    }
    let Fields::Named(fields) = &item.fields else {
        panic!("Entity `{}` must be a struct with named fields", item.ident);
    };
    let columns: Vec<_> = fields.named.iter().filter_map(decode_column).collect();
    if columns.iter().filter(|c| c.primary_key).count() > 1 {
        panic!(
            "Entity `{}` declares more than one `primary_key` field",
            item.ident
        );
    }
    let mut name = None;
    for attr in &item.attrs {
        let meta = &attr.meta;
        if !meta.path().is_ident("tabula") {
            continue;
        }
        let Ok(list) = meta.require_list() else {
            panic!("Error while parsing `tabula`, use it like: `#[tabula(table = \"my_table\")]`");
        };
        let _ = list.parse_nested_meta(|arg| {
            if arg.path.is_ident("table") {
                if arg.input.is_empty() || arg.input.peek(syn::Token![,]) {
                    let mut table = item.ident.to_string().to_case(Case::Snake);
                    if table.starts_with('_') {
                        table.remove(0);
                    }
                    name = Some(table);
                    return Ok(());
                }
                let Ok(value) = arg.value().and_then(ParseBuffer::parse::<LitStr>) else {
                    panic!(
                        "Error while parsing `table`, use it like: `#[tabula(table = \"my_table\")]` or `#[tabula(table)]`"
                    );
                };
                name = Some(value.value());
            } else {
                panic!(
                    "Unknown attribute `{}` inside tabula macro",
                    arg.path.get_ident().map(|v| v.to_string()).unwrap_or_default()
                );
            }
            Ok(())
        });
    }
    TableMetadata {
        item,
        name,
        columns,
    }
}
