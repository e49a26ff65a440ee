//! Ordering operations for the admin city list.
//!
//! Every operation leaves the list sorted with `order` equal to the position,
//! so the story always sees chapters in the order the admin arranged them.

use tracing::warn;

use crate::error::CityError;
use crate::models::{Chapter, City, INTRO_ID};

/// Sort by `order` (stable for ties) and rewrite `order` as 0, 1, 2, ...
pub fn renumber(cities: &mut [City]) {
    cities.sort_by_key(|c| c.order);
    for (i, city) in cities.iter_mut().enumerate() {
        city.order = i as u32;
    }
}

fn position(cities: &[City], id: &str) -> Option<usize> {
    cities.iter().position(|c| c.id == id)
}

/// Swap a city with its predecessor. Returns false at the top or when missing.
pub fn move_up(cities: &mut [City], id: &str) -> bool {
    match position(cities, id) {
        Some(i) if i > 0 => {
            cities.swap(i, i - 1);
            renumber_in_place(cities);
            true
        }
        _ => false,
    }
}

pub fn move_down(cities: &mut [City], id: &str) -> bool {
    match position(cities, id) {
        Some(i) if i + 1 < cities.len() => {
            cities.swap(i, i + 1);
            renumber_in_place(cities);
            true
        }
        _ => false,
    }
}

/// Move a city to `index`, clamped to the list bounds.
pub fn move_to(cities: &mut Vec<City>, id: &str, index: usize) -> bool {
    let Some(from) = position(cities, id) else {
        return false;
    };
    let city = cities.remove(from);
    let to = index.min(cities.len());
    cities.insert(to, city);
    renumber_in_place(cities);
    true
}

/// Check that `id` can name a new city: non-empty, not the intro id, not taken.
pub fn check_new_id(cities: &[City], id: &str) -> Result<(), CityError> {
    if id.is_empty() {
        return Err(CityError::EmptyId);
    }
    if id == INTRO_ID {
        return Err(CityError::ReservedId(id.to_string()));
    }
    if position(cities, id).is_some() {
        return Err(CityError::DuplicateId(id.to_string()));
    }
    Ok(())
}

/// Insert at `index` (clamped; `None` appends). Replaces a city with the same id.
pub fn insert(cities: &mut Vec<City>, city: City, index: Option<usize>) {
    if let Some(existing) = position(cities, &city.id) {
        cities.remove(existing);
    }
    let at = index.unwrap_or(cities.len()).min(cities.len());
    cities.insert(at, city);
    renumber_in_place(cities);
}

pub fn remove(cities: &mut Vec<City>, id: &str) -> Option<City> {
    let i = position(cities, id)?;
    let city = cities.remove(i);
    renumber_in_place(cities);
    Some(city)
}

/// Story chapters in display order. A city stored under the intro id is
/// dropped; the intro section already owns that id.
pub fn to_chapters(cities: &[City]) -> Vec<Chapter> {
    let mut sorted: Vec<&City> = cities
        .iter()
        .filter(|c| {
            if c.id == INTRO_ID {
                warn!(title = %c.title, "Skipping city that uses the intro id");
                return false;
            }
            true
        })
        .collect();
    sorted.sort_by_key(|c| c.order);
    sorted
        .into_iter()
        .map(|c| Chapter {
            id: c.id.clone(),
            title: c.title.clone(),
            location: c.location,
        })
        .collect()
}

/// Positions are already right; only the `order` fields need rewriting.
fn renumber_in_place(cities: &mut [City]) {
    for (i, city) in cities.iter_mut().enumerate() {
        city.order = i as u32;
    }
}
