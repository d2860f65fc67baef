pub mod record;
pub mod types;

pub use record::ProductRecord;
pub use types::ProductId;
