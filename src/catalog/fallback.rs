use once_cell::sync::Lazy;

use super::CatalogExercise;

static FALLBACK: Lazy<Vec<CatalogExercise>> = Lazy::new(|| {
    serde_json::from_str(include_str!("../../data/fallback_exercises.json"))
        .expect("bundled fallback catalog must be valid JSON")
});

/// The bundled exercise list, grouped by body zone, already in the display language.
pub fn fallback_exercises() -> &'static [CatalogExercise] {
    &FALLBACK
}

pub fn find_fallback(id: &str) -> Option<&'static CatalogExercise> {
    FALLBACK.iter().find(|exercise| exercise.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_bundled_list_loads() {
        let exercises = fallback_exercises();
        assert!(exercises.len() >= 40);
        assert!(exercises.iter().all(|e| !e.id.is_empty() && !e.name.is_empty()));
    }

    #[test]
    fn test_ids_are_unique() {
        let ids: HashSet<_> = fallback_exercises().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids.len(), fallback_exercises().len());
    }

    #[test]
    fn test_find_by_id() {
        let bench = find_fallback("bench-press").unwrap();
        assert_eq!(bench.name, "Press de Banca");
        assert_eq!(bench.body_parts, "Pecho");
        assert!(!bench.instructions.is_empty());

        assert!(find_fallback("does-not-exist").is_none());
    }

    #[test]
    fn test_every_zone_is_represented() {
        for zone in super::super::Zone::ALL {
            let matching = super::super::filter_by_zone(fallback_exercises().to_vec(), zone.label());
            assert!(!matching.is_empty(), "no fallback exercise for {}", zone.label());
        }
    }
}
