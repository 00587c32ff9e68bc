use serde::{Deserialize, Serialize};

use super::CatalogExercise;

/// Body zones offered by the exercise list filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    Pecho,
    Piernas,
    Espalda,
    Hombros,
    Brazos,
    Core,
}

impl Zone {
    pub const ALL: [Zone; 6] = [
        Zone::Pecho,
        Zone::Piernas,
        Zone::Espalda,
        Zone::Hombros,
        Zone::Brazos,
        Zone::Core,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Zone::Pecho => "Pecho",
            Zone::Piernas => "Piernas",
            Zone::Espalda => "Espalda",
            Zone::Hombros => "Hombros",
            Zone::Brazos => "Brazos",
            Zone::Core => "Core",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|zone| zone.label().eq_ignore_ascii_case(label))
    }

    /// Catalog body-part terms, in either language, that belong to this zone.
    pub fn body_part_terms(self) -> &'static [&'static str] {
        match self {
            Zone::Pecho => &["chest", "pecho"],
            Zone::Piernas => &["legs", "upper legs", "lower legs", "piernas"],
            Zone::Espalda => &["back", "espalda"],
            Zone::Hombros => &["shoulders", "hombros"],
            Zone::Brazos => &["arms", "upper arms", "lower arms", "brazos"],
            Zone::Core => &["waist", "core", "abs"],
        }
    }
}

/// Keep the exercises whose body-part field mentions the requested zone.
///
/// Unknown zone names are matched literally against the body-part field.
pub fn filter_by_zone(exercises: Vec<CatalogExercise>, zone: &str) -> Vec<CatalogExercise> {
    let zone = zone.trim();
    if zone.is_empty() {
        return exercises;
    }

    let literal = zone.to_lowercase();
    let terms: Vec<&str> = match Zone::from_label(zone) {
        Some(known) => known.body_part_terms().to_vec(),
        None => vec![literal.as_str()],
    };

    exercises
        .into_iter()
        .filter(|exercise| {
            let body_parts = exercise.body_parts.to_lowercase();
            terms.iter().any(|term| body_parts.contains(term))
        })
        .collect()
}
