//! File-backed storage for kiosk ratings and sessions.

mod error;
pub mod records;
pub mod store;

pub use error::StoreError;
pub use records::{
    parse_record, DailyRecord, NewRating, RatingRecord, SessionRecord, StoredRecord,
};
pub use store::{append_rating, FileStore};
