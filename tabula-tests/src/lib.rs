mod people;
mod simple;

pub use people::Person;
pub use simple::SimpleItem;

use log::LevelFilter;
use people::people;
use simple::simple;
use std::env;
use tabula::Connection;

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

/// Runs the whole suite, the connection must accept `CREATE TABLE` and `DROP TABLE IF EXISTS`.
pub fn execute_tests<C: Connection>(mut connection: C) {
    simple(&mut connection);
    people(&mut connection);
}

#[macro_export]
macro_rules! silent_logs {
    ($($code:tt)+) => {{
        let level = log::max_level();
        log::set_max_level(log::LevelFilter::Off);
        $($code)+
        log::set_max_level(level);
    }};
}
