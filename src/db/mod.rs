mod models;
mod schema;

pub use models::{PublicationCount, PublicationMeta, StoreTotals, WordCountRecord};
pub use schema::Database;
