//! Article id generation.

use uuid::Uuid;

/// generates a random article id.
///
/// An id is 16 bytes drawn from the operating system's random source, formatted as
/// dash-grouped lowercase hex in the 4-2-2-2-6 byte grouping (a version 4 UUID).
/// Generated ids are not checked against the existing collection, the collision
/// probability is treated as negligible.
pub fn generate() -> String {
    Uuid::new_v4().to_string()
}
