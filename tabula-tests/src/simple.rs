use std::sync::Mutex;
use tabula::{Connection, Entity, Repository, RepositoryContext, RepositoryState, accessors};

#[derive(Entity, Debug, Default, Clone, PartialEq)]
#[tabula(table = "simple_items")]
pub struct SimpleItem {
    #[tabula(column = "id", primary_key)]
    id: i32,
    #[tabula(column)]
    name: String,
    #[tabula(column)]
    price: f64,
}

#[accessors]
impl SimpleItem {
    pub fn new(id: i32, name: &str, price: f64) -> Self {
        Self {
            id,
            name: name.into(),
            price,
        }
    }
    pub fn get_id(&self) -> i32 {
        self.id
    }
    pub fn set_id(&mut self, id: i32) {
        self.id = id;
    }
    pub fn get_name(&self) -> String {
        self.name.clone()
    }
    pub fn set_name(&mut self, name: String) {
        self.name = name;
    }
    pub fn get_price(&self) -> f64 {
        self.price
    }
    pub fn set_price(&mut self, price: f64) {
        self.price = price;
    }
    #[tabula(fresh)]
    pub fn blank() -> Self {
        Self::default()
    }
}

pub fn simple<C: Connection>(connection: &mut C) {
    static MUTEX: Mutex<()> = Mutex::new(());
    let _lock = MUTEX.lock();

    // Setup
    connection
        .run("DROP TABLE IF EXISTS simple_items")
        .expect("Failed to drop simple_items");
    connection
        .run("CREATE TABLE simple_items (id INTEGER PRIMARY KEY, name VARCHAR(64), price DOUBLE)")
        .expect("Failed to create simple_items");
    let repository = Repository::<SimpleItem>::new(RepositoryContext::new());
    assert_eq!(repository.state(), RepositoryState::Initialized);
    assert!(repository.fresh_factory().is_some());

    // Round trip
    let mut hammer = SimpleItem::new(1, "hammer", 12.5);
    let mut saw = SimpleItem::new(2, "saw", 30.0);
    repository
        .create(connection, &mut hammer)
        .expect("Failed to create the hammer");
    repository
        .create(connection, &mut saw)
        .expect("Failed to create the saw");
    assert_eq!(hammer.get_id(), 1, "a manual key is kept");
    let mut found = SimpleItem::blank();
    repository
        .read_key(connection, &mut found, 1i32)
        .expect("Failed to read the hammer");
    assert_eq!(found, hammer);

    // Update twice, same row
    hammer.set_price(15.0);
    repository
        .update(connection, &hammer)
        .expect("Failed to update the hammer");
    repository
        .update(connection, &hammer)
        .expect("Failed to update the hammer again");
    let mut found = SimpleItem::new(1, "", 0.0);
    repository
        .read(connection, &mut found)
        .expect("Failed to read the updated hammer");
    assert_eq!(found, hammer);
    let mut all = repository.read_all(connection);
    all.sort_by_key(SimpleItem::get_id);
    assert_eq!(all, vec![hammer.clone(), saw.clone()]);

    // Missing row, the key stays written
    let mut missing = SimpleItem::blank();
    assert!(
        repository
            .try_read_key(connection, &mut missing, 42i32)
            .is_not_found()
    );
    assert_eq!(missing.get_id(), 42);

    // Key of the wrong type
    let outcome = repository.try_read_key(connection, &mut missing, 1i64);
    assert!(outcome.is_failed());
    assert_eq!(missing.get_id(), 42);

    // Delete
    assert!(repository.delete(connection, &hammer));
    let mut gone = SimpleItem::blank();
    assert!(repository.read_key(connection, &mut gone, 1i32).is_none());
    assert_eq!(repository.read_all(connection), vec![saw.clone()]);
    assert!(repository.delete(connection, &saw));
    assert!(repository.read_all(connection).is_empty());
}
