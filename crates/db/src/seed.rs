//! Default-location bootstrap.
//!
//! On a fresh database the registry auto-provisions a fixed set of campus
//! locations so the map is never empty. Runs once at startup; a non-empty
//! table makes it a no-op.

use sqlx::PgPool;
use smartqueue_core::qr::generate_qr_token;

use crate::models::location::CreateLocation;
use crate::repositories::LocationRepo;

/// (slug, name, kind, occupancy, capacity, wait mins, x, y)
const DEFAULT_LOCATIONS: &[(&str, &str, &str, i32, i32, i32, f64, f64)] = &[
    ("main-canteen", "Main Canteen", "canteen", 78, 100, 12, 30.0, 40.0),
    ("central-library", "Central Library", "library", 45, 150, 5, 60.0, 25.0),
    ("admin-office", "Admin Office", "office", 92, 100, 25, 45.0, 65.0),
    ("library-cafe", "Library Cafe", "cafe", 15, 50, 2, 75.0, 50.0),
    ("science-cafeteria", "Science Block Cafeteria", "canteen", 65, 80, 8, 20.0, 70.0),
];

/// Seed the default locations if the table is empty.
///
/// Each seeded location gets a freshly generated entry QR token. Returns the
/// number of locations inserted (zero when the registry already has records).
pub async fn seed_default_locations(pool: &PgPool) -> Result<u64, sqlx::Error> {
    if LocationRepo::count(pool).await? > 0 {
        return Ok(0);
    }

    let mut inserted = 0;
    for &(id, name, kind, occupancy, capacity, wait, x, y) in DEFAULT_LOCATIONS {
        let input = CreateLocation {
            id: id.to_string(),
            name: name.to_string(),
            kind: kind.to_string(),
            current_occupancy: occupancy,
            max_capacity: capacity,
            avg_wait_time_mins: wait,
            position_x: x,
            position_y: y,
            entry_qr_code: generate_qr_token(),
        };
        LocationRepo::create(pool, &input).await?;
        tracing::info!(location = name, "Seeded default location");
        inserted += 1;
    }
    Ok(inserted)
}
