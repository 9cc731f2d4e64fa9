//! Word inflection and case helpers used by the identifier normalizer.

/// Pluralization service consumed by identifier normalization.
///
/// Implementations must be deterministic; tests swap in a stub to pin
/// naming behaviour.
pub trait Pluralizer: Send + Sync {
    fn pluralize(&self, word: &str) -> String;
    fn singularize(&self, word: &str) -> String;
    fn is_plural(&self, word: &str) -> bool;
    fn is_singular(&self, word: &str) -> bool;
}

/// Words whose singular and plural forms are identical.
const UNINFLECTED: &[&str] = &[
    "aircraft",
    "bison",
    "data",
    "deer",
    "equipment",
    "feedback",
    "fish",
    "information",
    "metadata",
    "money",
    "moose",
    "news",
    "rice",
    "series",
    "sheep",
    "software",
    "species",
    "swine",
];

/// Irregular `(singular, plural)` pairs matched against the whole word.
const IRREGULAR: &[(&str, &str)] = &[
    ("alias", "aliases"),
    ("analysis", "analyses"),
    ("appendix", "appendices"),
    ("axis", "axes"),
    ("bonus", "bonuses"),
    ("bus", "buses"),
    ("cache", "caches"),
    ("calf", "calves"),
    ("campus", "campuses"),
    ("census", "censuses"),
    ("child", "children"),
    ("cookie", "cookies"),
    ("crisis", "crises"),
    ("criterion", "criteria"),
    ("diagnosis", "diagnoses"),
    ("echo", "echoes"),
    ("foot", "feet"),
    ("goose", "geese"),
    ("half", "halves"),
    ("hero", "heroes"),
    ("index", "indices"),
    ("knife", "knives"),
    ("leaf", "leaves"),
    ("lie", "lies"),
    ("life", "lives"),
    ("loaf", "loaves"),
    ("man", "men"),
    ("matrix", "matrices"),
    ("mouse", "mice"),
    ("movie", "movies"),
    ("niche", "niches"),
    ("ox", "oxen"),
    ("person", "people"),
    ("phenomenon", "phenomena"),
    ("pie", "pies"),
    ("potato", "potatoes"),
    ("quiz", "quizzes"),
    ("shelf", "shelves"),
    ("status", "statuses"),
    ("thesis", "theses"),
    ("thief", "thieves"),
    ("tie", "ties"),
    ("tomato", "tomatoes"),
    ("tooth", "teeth"),
    ("vertex", "vertices"),
    ("veto", "vetoes"),
    ("virus", "viruses"),
    ("wife", "wives"),
    ("wolf", "wolves"),
    ("woman", "women"),
];

/// Rule-based English pluralizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishPluralizer;

impl EnglishPluralizer {
    pub fn new() -> Self {
        Self
    }
}

impl Pluralizer for EnglishPluralizer {
    fn pluralize(&self, word: &str) -> String {
        let lower = word.to_lowercase();
        if lower.is_empty() || is_uninflected(&lower) {
            return word.to_string();
        }
        if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == lower) {
            return match_case(word, plural);
        }
        if IRREGULAR.iter().any(|(_, plural)| *plural == lower) {
            return word.to_string();
        }

        if ["s", "x", "z", "ch", "sh"]
            .iter()
            .any(|suffix| lower.ends_with(suffix))
        {
            return replace_suffix(word, 0, "es");
        }
        if ends_with_consonant_y(&lower) {
            return replace_suffix(word, 1, "ies");
        }
        replace_suffix(word, 0, "s")
    }

    fn singularize(&self, word: &str) -> String {
        let lower = word.to_lowercase();
        if lower.is_empty() || is_uninflected(&lower) {
            return word.to_string();
        }
        if let Some((singular, _)) = IRREGULAR.iter().find(|(_, plural)| *plural == lower) {
            return match_case(word, singular);
        }
        if IRREGULAR.iter().any(|(singular, _)| *singular == lower) {
            return word.to_string();
        }

        if lower.len() > 3 && lower.ends_with("ies") {
            return replace_suffix(word, 3, "y");
        }
        if ["sses", "shes", "ches", "xes", "zzes"]
            .iter()
            .any(|suffix| lower.ends_with(suffix))
        {
            return replace_suffix(word, 2, "");
        }
        if is_regular_plural(&lower) {
            return replace_suffix(word, 1, "");
        }
        word.to_string()
    }

    fn is_plural(&self, word: &str) -> bool {
        let lower = word.to_lowercase();
        if is_uninflected(&lower) {
            return true;
        }
        if IRREGULAR.iter().any(|(_, plural)| *plural == lower) {
            return true;
        }
        if IRREGULAR.iter().any(|(singular, _)| *singular == lower) {
            return false;
        }
        is_regular_plural(&lower)
    }

    fn is_singular(&self, word: &str) -> bool {
        let lower = word.to_lowercase();
        is_uninflected(&lower) || !self.is_plural(word)
    }
}

fn is_uninflected(lower: &str) -> bool {
    UNINFLECTED.contains(&lower)
}

fn is_regular_plural(lower: &str) -> bool {
    lower.len() > 1
        && lower.ends_with('s')
        && !lower.ends_with("ss")
        && !lower.ends_with("us")
        && !lower.ends_with("is")
}

fn ends_with_consonant_y(lower: &str) -> bool {
    let mut chars = lower.chars().rev();
    match (chars.next(), chars.next()) {
        (Some('y'), Some(prev)) => prev.is_alphabetic() && !"aeiou".contains(prev),
        _ => false,
    }
}

/// Drop `strip` trailing characters from `word` and append `suffix`, keeping
/// the word upper-case when it was written in capitals.
fn replace_suffix(word: &str, strip: usize, suffix: &str) -> String {
    let count = word.chars().count();
    let mut result: String = word.chars().take(count.saturating_sub(strip)).collect();
    if is_all_caps(word) {
        result.push_str(&suffix.to_uppercase());
    } else {
        result.push_str(suffix);
    }
    result
}

fn match_case(original: &str, replacement: &str) -> String {
    if is_all_caps(original) {
        return replacement.to_uppercase();
    }
    if original.chars().next().is_some_and(char::is_uppercase) {
        return make_initial_caps_only(replacement);
    }
    replacement.to_string()
}

fn is_all_caps(word: &str) -> bool {
    word.chars().count() > 1
        && word.chars().any(char::is_alphabetic)
        && word
            .chars()
            .filter(|c| c.is_alphabetic())
            .all(char::is_uppercase)
}

fn make_initial_caps_only(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Split a PascalCase or camelCase word on case transitions with underscores,
/// normalise dashes and whitespace to underscores, and lower-case the result.
pub fn add_underscores(word: &str) -> String {
    let chars: Vec<char> = word.chars().collect();
    let mut out = String::with_capacity(word.len() + 4);
    for (idx, &c) in chars.iter().enumerate() {
        if idx > 0 && c.is_ascii_uppercase() {
            let prev = chars[idx - 1];
            let next = chars.get(idx + 1).copied();
            let after_lower = prev.is_ascii_lowercase() || prev.is_ascii_digit();
            let acronym_end =
                prev.is_ascii_uppercase() && next.is_some_and(|n| n.is_ascii_lowercase());
            if after_lower || acronym_end {
                out.push('_');
            }
        }
        if c == '-' || c.is_whitespace() {
            out.push('_');
        } else {
            out.push(c);
        }
    }
    out.to_lowercase()
}

/// Replace underscores with spaces and capitalise the first letter only.
pub fn to_human_case(word: &str) -> String {
    make_initial_caps(&word.replace('_', " "))
}

/// Title case: every word starts with a capital, and a lower-case letter that
/// follows a digit is capitalised too.
pub fn to_title_case(word: &str) -> String {
    let human = to_human_case(&add_underscores(word));
    let mut out = String::with_capacity(human.len());
    let mut prev: Option<char> = None;
    for c in human.chars() {
        let at_boundary = prev.is_none_or(|p| !(p.is_alphanumeric() || p == '_'));
        let after_digit = prev.is_some_and(|p| p.is_ascii_digit());
        if c.is_ascii_lowercase() && (at_boundary || after_digit) {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
        prev = Some(c);
    }
    out
}

/// Upper-case the first character and lower-case the rest.
pub fn make_initial_caps(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Lower-case the first character and leave the rest untouched.
pub fn make_initial_lower_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
