pub mod books;
pub mod core;
pub mod exchange;
pub mod utils;
