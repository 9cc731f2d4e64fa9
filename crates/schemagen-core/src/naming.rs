//! Identifier normalization: scrubbing, case conversion, inflection and
//! collision avoidance for generated names.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, OnceLock};

use regex::Regex;

use crate::inflector::{make_initial_lower_case, to_title_case, EnglishPluralizer, Pluralizer};

/// Highest numeric suffix tried before collision resolution gives up.
pub const MAX_NAME_SUFFIX: u32 = 99;

const VIEW_PREFIX: &str = "vw_";

/// Re-conversions allowed while an inflected name settles, e.g. `IDs` to
/// `ID` to `Id`.
const MAX_CONVERSION_PASSES: usize = 4;

/// Members of the generated infrastructure a property must not shadow.
const RESERVED_MEMBERS: &[&str] = &[
    "event",
    "Equals",
    "GetHashCode",
    "GetType",
    "ToString",
    "repo",
    "Save",
    "IsNew",
    "Insert",
    "Update",
    "Delete",
    "Exists",
    "SingleOrDefault",
    "Single",
    "First",
    "FirstOrDefault",
    "Fetch",
    "Page",
    "Query",
];

/// Keywords of the target language.
const RESERVED_KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
    "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
    "volatile", "void", "while",
];

fn symbol_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\p{P}\p{S}]").expect("symbol pattern is valid"))
}

/// Make a raw SQL identifier safe to use as a code identifier.
///
/// Strips the `vw_` prefix, replaces punctuation and symbols (except `_`) with
/// their code point, drops anything else that is not a word character, and
/// prefixes `C` when the result would start with a digit. Idempotent.
pub fn scrub(name: &str) -> String {
    let stripped = strip_view_prefix(name);

    let replaced = symbol_regex().replace_all(stripped, |caps: &regex::Captures<'_>| {
        caps[0]
            .chars()
            .map(|c| {
                if c == '_' {
                    c.to_string()
                } else {
                    u32::from(c).to_string()
                }
            })
            .collect::<String>()
    });

    let cleaned: String = replaced
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect();
    let cleaned = strip_view_prefix(&cleaned);

    match cleaned.chars().next() {
        None => String::new(),
        Some(first) if first.is_numeric() => format!("C{cleaned}"),
        Some(_) => cleaned.to_string(),
    }
}

fn strip_view_prefix(name: &str) -> &str {
    name.trim_start_matches(VIEW_PREFIX)
}

/// Convert a SQL parameter name (`@CustomerId`) to a parameter identifier
/// (`customerId`).
pub fn to_parameter_name(sql_name: &str) -> String {
    let trimmed = sql_name.trim();
    let without_sigil = match trimmed.chars().next() {
        Some(first) if !(first.is_alphanumeric() || first == '_') => &trimmed[first.len_utf8()..],
        _ => trimmed,
    };
    make_initial_lower_case(without_sigil)
}

/// Returns true when `name` would shadow a keyword or a generated member.
pub fn is_reserved(name: &str) -> bool {
    RESERVED_MEMBERS.contains(&name) || RESERVED_KEYWORDS.contains(&name)
}

/// Append `_` to reserved names; other names pass through.
pub fn escape_reserved(name: String) -> String {
    if is_reserved(&name) {
        format!("{name}_")
    } else {
        name
    }
}

/// Identifier-safe and human-readable property names for one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyNames {
    pub identifier: String,
    pub human: String,
}

/// Naming service combining scrubbing, title casing and a pluralizer.
#[derive(Clone)]
pub struct Normalizer {
    pluralizer: Arc<dyn Pluralizer>,
}

impl Normalizer {
    pub fn new(pluralizer: impl Pluralizer + 'static) -> Self {
        Self {
            pluralizer: Arc::new(pluralizer),
        }
    }

    pub fn pluralizer(&self) -> &dyn Pluralizer {
        self.pluralizer.as_ref()
    }

    /// Singular PascalCase class name for a SQL identifier.
    pub fn class_name(&self, sql_name: &str) -> String {
        self.convert_last_word(sql_name, |p, word| {
            if p.is_plural(word) {
                p.singularize(word)
            } else {
                word.to_string()
            }
        })
    }

    /// Plural PascalCase collection name for a SQL identifier.
    pub fn class_name_plural(&self, sql_name: &str) -> String {
        self.convert_last_word(sql_name, |p, word| {
            if p.is_singular(word) {
                p.pluralize(word)
            } else {
                word.to_string()
            }
        })
    }

    /// Convert until the name is a fixpoint, so converting a converted name
    /// is a no-op.
    fn convert_last_word<F>(&self, sql_name: &str, convert: F) -> String
    where
        F: Fn(&dyn Pluralizer, &str) -> String,
    {
        let mut current = self.convert_once(sql_name, &convert);
        for _ in 0..MAX_CONVERSION_PASSES {
            let next = self.convert_once(&current, &convert);
            if next == current {
                break;
            }
            current = next;
        }
        current
    }

    fn convert_once<F>(&self, sql_name: &str, convert: &F) -> String
    where
        F: Fn(&dyn Pluralizer, &str) -> String,
    {
        let title = to_title_case(&scrub(sql_name));
        let mut words: Vec<String> = title.split_whitespace().map(str::to_string).collect();
        if let Some(last) = words.last_mut() {
            *last = convert(self.pluralizer.as_ref(), last);
        }
        words.concat()
    }

    /// Property names for a column of the table whose class name is `class_name`.
    ///
    /// Neither name equals the class name and the human-readable name never
    /// starts with a digit.
    pub fn property_names(&self, column_name: &str, class_name: &str) -> PropertyNames {
        let scrubbed = scrub(column_name);
        let mut human = self.class_name(&scrubbed);
        if human.is_empty() {
            human = scrubbed.clone();
        }

        let mut identifier = escape_reserved(scrubbed);
        let mut human = escape_reserved(human);

        if identifier == class_name {
            identifier.push('_');
        }
        if human == class_name {
            human.push('_');
        }
        if human.chars().next().is_some_and(|c| c.is_ascii_digit()) {
            human.insert(0, '_');
        }

        PropertyNames { identifier, human }
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(EnglishPluralizer::new())
    }
}

impl fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Normalizer").finish_non_exhaustive()
    }
}

/// Set of names already claimed on one table.
#[derive(Debug, Clone, Default)]
pub struct UniqueNames {
    claimed: BTreeSet<String>,
}

impl UniqueNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the set with names that already exist on the table.
    pub fn seeded<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            claimed: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.claimed.contains(name)
    }

    /// Claim the first free name of `name`, `name1` .. `name99`.
    ///
    /// When every suffix is taken the original name is returned unchanged and
    /// nothing new is recorded.
    pub fn claim(&mut self, name: &str) -> String {
        if self.claimed.insert(name.to_string()) {
            return name.to_string();
        }
        for n in 1..=MAX_NAME_SUFFIX {
            let candidate = format!("{name}{n}");
            if self.claimed.insert(candidate.clone()) {
                return candidate;
            }
        }
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoPluralizer;

    impl Pluralizer for EchoPluralizer {
        fn pluralize(&self, word: &str) -> String {
            format!("{word}Set")
        }
        fn singularize(&self, word: &str) -> String {
            word.trim_end_matches("Set").to_string()
        }
        fn is_plural(&self, word: &str) -> bool {
            word.ends_with("Set")
        }
        fn is_singular(&self, word: &str) -> bool {
            !word.ends_with("Set")
        }
    }

    #[test]
    fn scrub_replaces_symbols_and_strips_view_prefix() {
        assert_eq!(scrub("vw_ActiveUsers"), "ActiveUsers");
        assert_eq!(scrub("Order Details"), "OrderDetails");
        assert_eq!(scrub("Price$"), "Price36");
        assert_eq!(scrub("Rate%"), "Rate37");
        assert_eq!(scrub("first_name"), "first_name");
        assert_eq!(scrub("2020Sales"), "C2020Sales");
        assert_eq!(scrub(""), "");
    }

    #[test]
    fn scrub_is_idempotent() {
        for name in [
            "vw_vw_Sales",
            " vw_Sales",
            "#Temp",
            "2020Sales",
            "Order-Lines",
            "naïve_café",
            "a.b.c",
            "vw_1st",
        ] {
            let once = scrub(name);
            assert_eq!(scrub(&once), once, "scrub not idempotent for {name:?}");
        }
    }

    #[test]
    fn class_names_convert_only_the_last_word() {
        let normalizer = Normalizer::default();
        assert_eq!(normalizer.class_name("order_items"), "OrderItem");
        assert_eq!(normalizer.class_name("Customers"), "Customer");
        assert_eq!(normalizer.class_name("NewsItems"), "NewsItem");
        assert_eq!(normalizer.class_name_plural("Customer"), "Customers");
        assert_eq!(normalizer.class_name_plural("vw_OrderSummary"), "OrderSummaries");
    }

    #[test]
    fn class_name_is_stable() {
        let normalizer = Normalizer::default();
        for name in [
            "Invoices",
            "order_items",
            "HTMLPages",
            "Addresses",
            "user2factors",
            "CustomerIDs",
            "IDs",
            "Order_IDs",
        ] {
            let once = normalizer.class_name(name);
            assert_eq!(normalizer.class_name(&once), once);
            let plural = normalizer.class_name_plural(name);
            assert_eq!(normalizer.class_name_plural(&plural), plural);
        }
    }

    #[test]
    fn acronym_plurals_settle_on_one_spelling() {
        let normalizer = Normalizer::default();
        assert_eq!(normalizer.class_name("CustomerIDs"), "CustomerId");
        assert_eq!(normalizer.class_name("IDs"), "Id");
        assert_eq!(normalizer.class_name("Order_IDs"), "OrderId");
    }

    #[test]
    fn pluralizer_is_swappable() {
        let normalizer = Normalizer::new(EchoPluralizer);
        assert_eq!(normalizer.class_name("customer"), "Customer");
        assert_eq!(normalizer.class_name_plural("customer"), "CustomerSet");
    }

    #[test]
    fn parameter_names_drop_sigil_and_lower_first_letter() {
        assert_eq!(to_parameter_name("@CustomerId"), "customerId");
        assert_eq!(to_parameter_name("@ID"), "iD");
        assert_eq!(to_parameter_name("Total"), "total");
    }

    #[test]
    fn property_names_avoid_reserved_members_and_class_name() {
        let normalizer = Normalizer::default();

        let save = normalizer.property_names("Save", "Order");
        assert_eq!(save.identifier, "Save_");
        assert_eq!(save.human, "Save_");

        let clash = normalizer.property_names("Order", "Order");
        assert_eq!(clash.identifier, "Order_");
        assert_eq!(clash.human, "Order_");

        let keyword = normalizer.property_names("class", "Course");
        assert_eq!(keyword.identifier, "class_");
        assert_eq!(keyword.human, "Class");

        let digits = normalizer.property_names("2ndLine", "Address");
        assert_eq!(digits.identifier, "C2ndLine");
        assert!(!digits.human.starts_with(|c: char| c.is_ascii_digit()));
    }

    #[test]
    fn unique_names_suffix_on_collision() {
        let mut names = UniqueNames::seeded(["Invoice", "Id"]);
        assert_eq!(names.claim("Customer"), "Customer");
        assert_eq!(names.claim("Customer"), "Customer1");
        assert_eq!(names.claim("Customer"), "Customer2");
        assert_eq!(names.claim("Invoice"), "Invoice1");
    }

    #[test]
    fn unique_names_give_up_after_budget() {
        let mut names = UniqueNames::seeded(
            std::iter::once("Name".to_string())
                .chain((1..=MAX_NAME_SUFFIX).map(|n| format!("Name{n}"))),
        );
        assert_eq!(names.claim("Name"), "Name");
    }
}
