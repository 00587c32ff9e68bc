use once_cell::sync::Lazy;

/// English catalog vocabulary and its Spanish display form.
const TERMS: &[(&str, &str)] = &[
    // Body parts (the zone filter depends on these)
    ("chest", "Pecho"),
    ("back", "Espalda"),
    ("shoulders", "Hombros"),
    ("upper arms", "Brazos"),
    ("lower arms", "Antebrazos"),
    ("upper legs", "Piernas"),
    ("lower legs", "Pantorrillas"),
    ("waist", "Core"),
    ("cardio", "Cardio"),
    ("neck", "Cuello"),
    // Compound lifts
    ("barbell bench press", "Press de Banca con Barra"),
    ("dumbbell bench press", "Press de Banca con Mancuernas"),
    ("incline bench press", "Press Inclinado"),
    ("decline bench press", "Press Declinado"),
    ("close grip bench press", "Press con Agarre Cerrado"),
    ("bench press", "Press de Banca"),
    ("barbell squat", "Sentadilla con Barra"),
    ("front squat", "Sentadilla Frontal"),
    ("goblet squat", "Sentadilla Goblet"),
    ("jump squat", "Sentadilla con Salto"),
    ("bulgarian split squat", "Sentadilla Búlgara"),
    ("squat", "Sentadilla"),
    ("romanian deadlift", "Peso Muerto Rumano"),
    ("sumo deadlift", "Peso Muerto Sumo"),
    ("deadlift", "Peso Muerto"),
    ("shoulder press", "Press Militar"),
    ("military press", "Press Militar"),
    ("overhead press", "Press sobre Cabeza"),
    ("arnold press", "Press Arnold"),
    ("barbell row", "Remo con Barra"),
    ("dumbbell row", "Remo con Mancuerna"),
    ("cable row", "Remo en Polea"),
    ("seated row", "Remo Sentado"),
    // Isolation and bodyweight movements
    ("pull-up", "Dominadas"),
    ("pull up", "Dominadas"),
    ("chin-up", "Dominadas Supinas"),
    ("chin up", "Dominadas Supinas"),
    ("leg press", "Prensa de Piernas"),
    ("leg curl", "Curl Femoral"),
    ("leg extension", "Extensión de Piernas"),
    ("calf raise", "Elevación de Gemelos"),
    ("lunge", "Zancada"),
    ("lunges", "Zancadas"),
    ("bicep curl", "Curl de Bíceps"),
    ("hammer curl", "Curl Martillo"),
    ("preacher curl", "Curl Predicador"),
    ("concentration curl", "Curl Concentrado"),
    ("tricep extension", "Extensión de Tríceps"),
    ("tricep dips", "Fondos de Tríceps"),
    ("tricep pushdown", "Extensión en Polea"),
    ("plank", "Plancha"),
    ("side plank", "Plancha Lateral"),
    ("crunch", "Abdominales"),
    ("crunches", "Abdominales"),
    ("sit-up", "Abdominales"),
    ("sit up", "Abdominales"),
    ("russian twist", "Giros Rusos"),
    ("leg raise", "Elevación de Piernas"),
    ("mountain climber", "Escaladores"),
    ("bicycle crunch", "Abdominales Bicicleta"),
    ("push-up", "Flexiones"),
    ("push up", "Flexiones"),
    ("burpee", "Burpees"),
    ("dip", "Fondos"),
    ("dips", "Fondos"),
    ("lateral raise", "Elevación Lateral"),
    ("front raise", "Elevación Frontal"),
    ("face pull", "Face Pull"),
    ("shrug", "Encogimientos"),
    // Equipment
    ("barbell", "Barra"),
    ("dumbbell", "Mancuernas"),
    ("kettlebell", "Pesa Rusa"),
    ("body weight", "Peso Corporal"),
    ("cable", "Polea"),
    ("machine", "Máquina"),
    ("resistance band", "Banda"),
    ("medicine ball", "Balón Medicinal"),
];

/// Dictionary sorted longest key first so compound names win over their parts.
static BY_LENGTH: Lazy<Vec<(&'static str, &'static str)>> = Lazy::new(|| {
    let mut terms = TERMS.to_vec();
    terms.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then(a.0.cmp(b.0)));
    terms
});

/// Translate catalog text into the display language.
///
/// A whole-string match returns the dictionary entry directly. Otherwise every
/// dictionary term found on word boundaries is replaced, longest term first at each
/// position, and text between matches is copied through untouched. The first
/// character is upper-cased only when at least one substitution happened.
pub fn translate(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed == "N/A" {
        return text.to_string();
    }

    let lowered = trimmed.to_lowercase();
    if let Some((_, spanish)) = TERMS.iter().find(|(english, _)| *english == lowered) {
        return spanish.to_string();
    }

    let mut output = String::with_capacity(text.len());
    let mut substituted = false;
    let mut cursor = 0;

    while cursor < text.len() {
        match match_at(text, cursor) {
            Some((english, spanish)) => {
                output.push_str(spanish);
                cursor += english.len();
                substituted = true;
            }
            None => {
                // Advance one whole character to stay on UTF-8 boundaries
                let ch = text[cursor..].chars().next().unwrap_or_default();
                output.push(ch);
                cursor += ch.len_utf8().max(1);
            }
        }
    }

    if substituted {
        capitalize_first(&output)
    } else {
        output
    }
}

fn match_at(text: &str, start: usize) -> Option<(&'static str, &'static str)> {
    if !starts_word(text, start) {
        return None;
    }
    BY_LENGTH.iter().copied().find(|(english, _)| {
        let end = start + english.len();
        text.get(start..end)
            .is_some_and(|candidate| candidate.eq_ignore_ascii_case(english))
            && ends_word(text, end)
    })
}

fn starts_word(text: &str, start: usize) -> bool {
    text[..start]
        .chars()
        .next_back()
        .map_or(true, |ch| !ch.is_alphanumeric())
}

fn ends_word(text: &str, end: usize) -> bool {
    text.get(end..)
        .and_then(|rest| rest.chars().next())
        .map_or(true, |ch| !ch.is_alphanumeric())
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_exact_matches() {
        assert_eq!(translate("bench press"), "Press de Banca");
        assert_eq!(translate("chest"), "Pecho");
        assert_eq!(translate("  Upper Legs "), "Piernas");
    }

    #[test]
    fn test_longest_term_wins() {
        assert_eq!(translate("barbell bench press"), "Press de Banca con Barra");
        assert_eq!(
            translate("barbell bench press with pause"),
            "Press de Banca con Barra with pause"
        );
        assert_eq!(translate("walking lunges"), "Walking Zancadas");
    }

    #[test]
    fn test_lists_of_terms() {
        assert_eq!(translate("upper arms, chest"), "Brazos, Pecho");
        assert_eq!(translate("dumbbell, cable"), "Mancuernas, Polea");
    }

    #[test]
    fn test_already_translated_text_is_untouched() {
        for text in ["Press de Banca", "Pecho", "Sentadilla con Barra", "Burpees", "Cardio", "Face Pull"] {
            assert_eq!(translate(text), text);
        }
    }

    #[test]
    fn test_terms_inside_words_are_not_replaced() {
        assert_eq!(translate("feedback"), "feedback");
        assert_eq!(translate("dipping bars"), "dipping bars");
    }

    #[test]
    fn test_empty_and_placeholder_input() {
        assert_eq!(translate(""), "");
        assert_eq!(translate("   "), "   ");
        assert_eq!(translate("N/A"), "N/A");
    }

    #[test]
    fn test_unrecognized_text_keeps_its_case() {
        assert_eq!(translate("olympic snatch"), "olympic snatch");
        assert_eq!(translate("kettlebell swing"), "Pesa Rusa swing");
    }

    proptest! {
        #[test]
        fn prop_text_without_letters_is_unchanged(text in "[0-9 ,.:-]{0,40}") {
            prop_assert_eq!(translate(&text), text);
        }

        #[test]
        fn prop_translation_is_stable(text in "(chest|back|squat|plank|olympic|row|[a-z]{1,6})( (chest|back|squat|plank|olympic|[a-z]{1,6})){0,4}") {
            let once = translate(&text);
            prop_assert_eq!(translate(&once), once.clone());
        }
    }
}
