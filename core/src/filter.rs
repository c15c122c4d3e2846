//! Search filtering over a fetched pet list.

use crate::types::Pet;

/// Records whose title or description contains `query`, ignoring case.
///
/// An empty query matches everything. Order is preserved.
pub fn filter_pets<'a>(pets: &'a [Pet], query: &str) -> Vec<&'a Pet> {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return pets.iter().collect();
    }
    pets.iter()
        .filter(|pet| {
            pet.title.to_lowercase().contains(&needle)
                || pet.description.to_lowercase().contains(&needle)
        })
        .collect()
}
