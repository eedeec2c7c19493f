// Brand lists and defaults shared by the matcher, config and CLI.

/// Separator used when one relation record lists several related brands.
pub const RELATION_SEPARATOR: char = ';';

/// Brands that only ever produce false positives. Never matched.
pub const IGNORED_BRANDS: &[&str] = &["bio", "neb"];

/// Brand whose name collides with an ordinary English word; only the
/// capitalized spellings below count as a hit.
pub const CASE_SENSITIVE_BRAND: &str = "happy";
pub const CASE_SENSITIVE_FORMS: &[&str] = &["Happy", "HAPPY"];

/// Short or common-word brands that only count as the first word of a title.
pub const FRONT_ONLY_BRANDS: &[&str] = &[
    "rich", "rff", "flex", "ultra", "gum", "beauty", "orto", "free", "112", "kin", "happy",
];

/// Brands that count as the first or second word of a title.
pub const FRONT_OR_SECOND_BRANDS: &[&str] = &["heel", "contour", "nero", "rsv"];

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
pub const CONFIG_PATH_ENV: &str = "BRAND_RESOLVER_CONFIG";

pub const DEFAULT_RELATIONS_PATH: &str = "data/brand_relations.json";
pub const DEFAULT_PRODUCTS_PATH: &str = "data/products.json";
pub const DEFAULT_OUTPUT_PATH: &str = "output/brand_assignments.ndjson";

pub const DEFAULT_SOURCE: &str = "default";
pub const DEFAULT_COUNTRY_CODE: &str = "xx";

pub fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
