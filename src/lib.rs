pub mod fetch;
pub mod orders;
pub mod schema;
pub mod settings;
pub mod sheet;
