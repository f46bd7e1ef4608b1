//! Lookup keys derived from a company name.
//!
//! Derivation is deterministic and order-preserving; duplicates are
//! removed keeping the first occurrence.

use indexmap::IndexSet;

use crate::types::config::Region;
use crate::types::observation::CompanyQuery;

/// Trailing words dropped to get the bare brand name.
pub const CORPORATE_SUFFIXES: &[&str] = &[
    "pte", "ltd", "private", "limited", "inc", "llc", "corp", "co", "plc", "sdn", "bhd",
];

/// Words too common to identify a company on their own.
const HINT_STOP_WORDS: &[&str] = &["the", "a", "an", "and", "of", "&"];

/// Keys every adapter draws its candidates from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyKeys {
    /// Trimmed name as given
    pub name: String,
    /// Name with trailing corporate suffixes removed
    pub stripped_name: String,
    /// `acme-pte-ltd`
    pub slug: String,
    /// `acme`
    pub stripped_slug: String,
    /// `acme-sg`
    pub code_slug: String,
    /// `acme-singapore`
    pub region_slug: String,
    /// `acme`, ASCII only, no hyphens (domain label)
    pub compact: String,
}

impl CompanyKeys {
    pub fn derive(company: &CompanyQuery, region: &Region) -> Self {
        let name = company.as_str().to_string();
        let stripped_name = strip_corporate_suffixes(&name);
        let slug = slugify(&name);
        let stripped_slug = slugify(&stripped_name);
        let code_slug = join_slug(&stripped_slug, &slugify(&region.code));
        let region_slug = join_slug(&stripped_slug, &region.slug_name());
        let compact = stripped_slug
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();

        Self {
            name,
            stripped_name,
            slug,
            stripped_slug,
            code_slug,
            region_slug,
            compact,
        }
    }

    /// Full and stripped slugs.
    pub fn slugs(&self) -> Vec<String> {
        dedup([self.slug.clone(), self.stripped_slug.clone()])
    }

    /// Full and stripped slugs, then region-qualified variants.
    pub fn slugs_with_region(&self) -> Vec<String> {
        dedup([
            self.slug.clone(),
            self.stripped_slug.clone(),
            self.code_slug.clone(),
            self.region_slug.clone(),
        ])
    }

    /// Full and stripped display names.
    pub fn names(&self) -> Vec<String> {
        dedup([self.name.clone(), self.stripped_name.clone()])
    }

    /// Lower-cased first distinctive word, used to spot lines about the company.
    ///
    /// Leading stop words are skipped; a name made only of stop words falls
    /// back to its first word.
    pub fn hint(&self) -> String {
        let words: Vec<String> = self
            .stripped_name
            .split_whitespace()
            .map(|w| {
                w.trim_matches(|c: char| !c.is_alphanumeric() && c != '&')
                    .to_lowercase()
            })
            .filter(|w| !w.is_empty())
            .collect();

        words
            .iter()
            .find(|w| !HINT_STOP_WORDS.contains(&w.as_str()))
            .or_else(|| words.first())
            .cloned()
            .unwrap_or_default()
    }
}

/// Lower-case, whitespace to `-`, drop anything that is not alphanumeric.
pub fn slugify(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_alphanumeric() || *c == '-')
                .flat_map(char::to_lowercase)
                .collect::<String>()
        })
        .flat_map(|word| {
            word.split('-')
                .filter(|part| !part.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>()
        .join("-")
}

/// Remove trailing corporate suffix words ("Pte. Ltd.", "Limited", ...).
///
/// A name made only of suffix words is returned unchanged.
pub fn strip_corporate_suffixes(name: &str) -> String {
    let mut words: Vec<&str> = name.split_whitespace().collect();
    while let Some(last) = words.last() {
        let bare = last
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();
        if !CORPORATE_SUFFIXES.contains(&bare.as_str()) || words.len() == 1 {
            break;
        }
        words.pop();
    }
    words
        .join(" ")
        .trim_end_matches(|c: char| c == ',' || c == '.')
        .to_string()
}

/// Order-preserving dedup that also drops empty keys.
pub fn dedup<I>(keys: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    keys.into_iter()
        .filter(|k| !k.is_empty())
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

fn join_slug(base: &str, suffix: &str) -> String {
    match (base.is_empty(), suffix.is_empty()) {
        (true, _) => String::new(),
        (false, true) => base.to_string(),
        (false, false) => format!("{}-{}", base, suffix),
    }
}
