/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Category `type` discriminator for movies.
pub const CATEGORY_TYPE_MOVIE: i16 = 1;

/// Category `type` discriminator for TV series.
pub const CATEGORY_TYPE_SERIES: i16 = 2;
