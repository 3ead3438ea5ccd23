use crate::silent_logs;
use std::sync::{Arc, Mutex};
use tabula::{
    Connection, Entity, Fault, MemorySink, Outcome, Repository, RepositoryContext, accessors,
};

#[derive(Entity, Debug, Default, Clone, PartialEq)]
#[tabula(table)]
pub struct Person {
    #[tabula(column, primary_key, auto_increment)]
    id: i64,
    #[tabula(column = "first_name")]
    first_name: String,
    #[tabula(column)]
    last_name: String,
    #[tabula(column)]
    weight: f32,
    #[tabula(column)]
    age: i8,
    #[tabula(column)]
    active: bool,
    #[tabula(column)]
    nickname: Option<String>,
}

#[accessors]
impl Person {
    pub fn new(first_name: &str, last_name: &str, weight: f32, age: i8) -> Self {
        Self {
            id: 0,
            first_name: first_name.into(),
            last_name: last_name.into(),
            weight,
            age,
            active: true,
            nickname: None,
        }
    }
    pub fn get_id(&self) -> i64 {
        self.id
    }
    pub fn set_id(&mut self, id: i64) {
        self.id = id;
    }
    pub fn get_first_name(&self) -> String {
        self.first_name.clone()
    }
    pub fn set_first_name(&mut self, first_name: String) {
        self.first_name = first_name;
    }
    pub fn get_last_name(&self) -> String {
        self.last_name.clone()
    }
    pub fn set_last_name(&mut self, last_name: String) {
        self.last_name = last_name;
    }
    pub fn get_weight(&self) -> f32 {
        self.weight
    }
    pub fn set_weight(&mut self, weight: f32) {
        self.weight = weight;
    }
    pub fn get_age(&self) -> i8 {
        self.age
    }
    pub fn set_age(&mut self, age: i8) {
        self.age = age;
    }
    pub fn is_active(&self) -> bool {
        self.active
    }
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }
    pub fn get_nickname(&self) -> Option<String> {
        self.nickname.clone()
    }
    pub fn set_nickname(&mut self, nickname: Option<String>) {
        self.nickname = nickname;
    }
    #[tabula(fresh)]
    pub fn fresh() -> Self {
        Self::default()
    }
}

pub fn people<C: Connection>(connection: &mut C) {
    static MUTEX: Mutex<()> = Mutex::new(());
    let _lock = MUTEX.lock();

    // Setup
    connection
        .run("DROP TABLE IF EXISTS person")
        .expect("Failed to drop person");
    connection
        .run(
            "CREATE TABLE person (id INTEGER PRIMARY KEY, first_name VARCHAR(64), last_name VARCHAR(64), \
            weight FLOAT, age TINYINT, active BOOLEAN, nickname VARCHAR(64))",
        )
        .expect("Failed to create person");
    let sink = Arc::new(MemorySink::new());
    let repository = Repository::<Person>::new(
        RepositoryContext::new()
            .with_sink(sink.clone())
            .breadcrumbs(true),
    );
    assert_eq!(repository.schema().table(), "person");
    assert_eq!(repository.persist_writable().len(), 6);

    // Generated keys replace the supplied ones
    let mut ada = Person::new("Ada", "Lovelace", 58.5, 36);
    ada.set_id(999);
    ada.set_nickname(Some("Enchantress".into()));
    repository
        .create(connection, &mut ada)
        .expect("Failed to create Ada");
    assert_eq!(ada.get_id(), 1);
    let mut alan = Person::new("Alan", "Turing", 70.25, 41);
    alan.set_active(false);
    repository
        .create(connection, &mut alan)
        .expect("Failed to create Alan");
    assert_eq!(alan.get_id(), 2);
    assert!(
        sink.messages()
            .iter()
            .any(|v| v.contains("INSERT INTO person (first_name, last_name, weight, age, active, nickname) VALUES (?, ?, ?, ?, ?, ?)")),
        "the breadcrumbs contain the generated insert"
    );

    // Round trip
    let mut found = Person::fresh();
    repository
        .read_key(connection, &mut found, 1i64)
        .expect("Failed to read Ada");
    assert_eq!(found, ada);

    // An absent nickname is stored as the empty string
    let mut found = Person::fresh();
    repository
        .read_key(connection, &mut found, 2i64)
        .expect("Failed to read Alan");
    assert_eq!(found.get_nickname(), Some(String::new()));
    assert!(!found.is_active());
    assert_eq!(found.get_weight(), 70.25);

    // Bulk read
    let mut all = repository.read_all(connection);
    all.sort_by_key(Person::get_id);
    assert_eq!(all.len(), 2);
    assert_eq!(all[0], ada);
    assert_eq!(all[1].get_first_name(), "Alan");

    // Delete
    assert!(repository.delete(connection, &alan));
    let mut gone = Person::fresh();
    assert!(
        repository
            .try_read_key(connection, &mut gone, 2i64)
            .is_not_found()
    );

    // Backend failures decline
    connection
        .run("DROP TABLE person")
        .expect("Failed to drop person");
    silent_logs! {
        let outcome = repository.try_create(connection, &mut alan);
        assert!(matches!(
            outcome,
            Outcome::Failed(Fault::BackendExecutionFailure { .. })
        ));
        assert!(repository.read_all(connection).is_empty());
        assert!(!repository.delete(connection, &ada));
    }
}
