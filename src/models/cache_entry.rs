use diesel::prelude::*;
use jiff_diesel::Timestamp;

/// Row written by the upsert in `SqlStore::set`.
/// `value` holds the JSON-serialized cache value.
#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::cache_entries)]
pub struct NewCacheRow<'a> {
    pub key: &'a str,
    pub value: &'a str,
    pub expires_on: Option<Timestamp>,
}
