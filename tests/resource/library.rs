use tabula::{Accessors, Entity, accessors};

#[derive(Entity, Debug, Default, Clone, PartialEq)]
#[tabula(table = "books")]
pub struct Book {
    #[tabula(column, primary_key, auto_increment)]
    pub id: i64,
    #[tabula(column)]
    pub title: String,
    #[tabula(column = "page_count")]
    pub pages: i32,
    #[tabula(column)]
    pub rating: f64,
    #[tabula(column)]
    pub available: bool,
    #[tabula(column)]
    pub subtitle: Option<String>,
    pub notes: Vec<String>,
}

#[accessors]
impl Book {
    pub fn new(title: &str, pages: i32) -> Self {
        Self {
            title: title.into(),
            pages,
            ..Default::default()
        }
    }
    pub fn get_id(&self) -> i64 {
        self.id
    }
    pub fn set_id(&mut self, id: i64) {
        self.id = id;
    }
    pub fn get_title(&self) -> String {
        self.title.clone()
    }
    pub fn set_title(&mut self, title: String) {
        self.title = title;
    }
    pub fn get_pages(&self) -> i32 {
        self.pages
    }
    pub fn set_pages(&mut self, pages: i32) {
        self.pages = pages;
    }
    pub fn get_rating(&self) -> f64 {
        self.rating
    }
    pub fn set_rating(&mut self, rating: f64) {
        self.rating = rating;
    }
    pub fn is_available(&self) -> bool {
        self.available
    }
    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }
    pub fn get_subtitle(&self) -> Option<String> {
        self.subtitle.clone()
    }
    pub fn set_subtitle(&mut self, subtitle: Option<String>) {
        self.subtitle = subtitle;
    }
    #[tabula(fresh)]
    pub fn blank() -> Self {
        Self::default()
    }
}

/// Accessors bound by name, the key column is not named after its field.
#[derive(Entity, Debug, Default, Clone, PartialEq)]
#[tabula(table = "accounts")]
pub struct Account {
    #[tabula(column = "account_id", primary_key)]
    pub _id: i32,
    #[tabula(column)]
    pub owner: String,
    #[tabula(column)]
    pub balance: i64,
}

#[accessors]
impl Account {
    #[tabula(reader = "account_id")]
    pub fn identifier(&self) -> i32 {
        self._id
    }
    #[tabula(writer = "account_id")]
    pub fn assign(&mut self, id: i32) {
        self._id = id;
    }
    pub fn get_owner(&self) -> &str {
        &self.owner
    }
    pub fn set_owner(&mut self, owner: String) {
        self.owner = owner;
    }
    pub fn get_balance(&self) -> i64 {
        self.balance
    }
    pub fn set_balance(&mut self, balance: i64) -> &mut Self {
        self.balance = balance;
        self
    }
}

/// Derives the metadata but declares no table.
#[derive(Entity, Debug, Default)]
pub struct Loose {
    #[tabula(column)]
    pub value: i32,
}

impl Accessors for Loose {}
