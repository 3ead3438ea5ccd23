use std::{collections::VecDeque, fmt, sync::Arc, vec};
use tabula::{
    Connection, Driver, Error, GeneratedKeys, GenericSqlWriter, Prepared, Result, RowLabeled,
    RowsAffected, Value,
};

/// A statement as the repository sent it.
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub sql: String,
    pub keys: Option<String>,
    pub params: Vec<(u64, Value)>,
    pub executed: bool,
}

#[derive(Debug, Default)]
pub struct RecorderDriver;

impl Driver for RecorderDriver {
    type SqlWriter = GenericSqlWriter;

    const NAME: &'static str = "recorder";

    fn sql_writer(&self) -> GenericSqlWriter {
        GenericSqlWriter::new()
    }
}

/// Connection that records every statement and answers with scripted rows.
#[derive(Debug, Default)]
pub struct Recorder {
    pub statements: Vec<Recorded>,
    /// Result of each `query`, in order. An exhausted script returns no rows.
    pub rows: VecDeque<Vec<RowLabeled>>,
    pub rows_affected: u64,
    pub generated: Option<i64>,
    /// The next `prepare` fails with this message.
    pub fail: Option<String>,
}

impl Recorder {
    pub fn new() -> Self {
        Self {
            rows_affected: 1,
            ..Default::default()
        }
    }

    pub fn push_rows(&mut self, labels: &[&str], rows: Vec<Vec<Value>>) {
        let labels: Arc<[String]> = labels.iter().map(|v| v.to_string()).collect();
        self.rows.push_back(
            rows.into_iter()
                .map(|v| RowLabeled::new(labels.clone(), v.into_boxed_slice()))
                .collect(),
        );
    }

    pub fn last(&self) -> &Recorded {
        self.statements.last().expect("No statement was recorded")
    }
}

impl Connection for Recorder {
    type Driver = RecorderDriver;
    type Prepared<'c> = RecorderPrepared<'c>;

    fn connect(_url: &str) -> Result<Self> {
        Ok(Recorder::new())
    }

    fn driver(&self) -> &Self::Driver {
        &RecorderDriver
    }

    fn prepare(&mut self, sql: &str, keys: GeneratedKeys<'_>) -> Result<RecorderPrepared<'_>> {
        if let Some(message) = self.fail.take() {
            return Err(Error::msg(message));
        }
        self.statements.push(Recorded {
            sql: sql.to_string(),
            keys: match keys {
                GeneratedKeys::None => None,
                GeneratedKeys::Returned(column) => Some(column.to_string()),
            },
            params: Vec::new(),
            executed: false,
        });
        Ok(RecorderPrepared { recorder: self })
    }
}

pub struct RecorderPrepared<'c> {
    recorder: &'c mut Recorder,
}

impl<'c> RecorderPrepared<'c> {
    fn current(&mut self) -> &mut Recorded {
        self.recorder
            .statements
            .last_mut()
            .expect("The statement was prepared")
    }
}

impl<'c> Prepared for RecorderPrepared<'c> {
    type Rows<'s>
        = vec::IntoIter<Result<RowLabeled>>
    where
        Self: 's;

    fn bind_index(&mut self, value: Value, position: u64) -> Result<&mut Self> {
        self.current().params.push((position, value));
        Ok(self)
    }

    fn execute(&mut self) -> Result<RowsAffected> {
        self.current().executed = true;
        Ok(RowsAffected {
            rows_affected: self.recorder.rows_affected,
            last_affected_id: None,
        })
    }

    fn query(&mut self) -> Result<Self::Rows<'_>> {
        self.current().executed = true;
        let rows = self.recorder.rows.pop_front().unwrap_or_default();
        Ok(rows.into_iter().map(Ok).collect::<Vec<_>>().into_iter())
    }

    fn generated_keys(&mut self) -> Result<Option<RowLabeled>> {
        let generated = self.recorder.generated;
        Ok(self.current().keys.clone().zip(generated).map(|(key, id)| {
            RowLabeled::new(Arc::from([key]), vec![Value::Int64(Some(id))].into_boxed_slice())
        }))
    }
}

impl<'c> fmt::Display for RecorderPrepared<'c> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.recorder.statements.last() {
            Some(v) => f.write_str(&v.sql),
            None => f.write_str("<nothing>"),
        }
    }
}
