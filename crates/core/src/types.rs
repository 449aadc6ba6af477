/// User, ticket, and check-in primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Location primary keys are human-readable slugs (e.g. `main-canteen`)
/// because they are embedded in printed QR payloads.
pub type LocationId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
