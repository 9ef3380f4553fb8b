//! Normalized region identifiers shared by every table.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// An administrative region (state or union territory).
///
/// The two input sources spell region names differently (casing, stray
/// whitespace), so a `Region` keeps the spelling it was built from for display
/// but compares, orders and hashes on a normalized key: surrounding whitespace
/// trimmed, internal runs of whitespace collapsed to one space, lowercase.
#[derive(Debug, Clone)]
pub struct Region {
    name: String,
    key: String,
}

impl Region {
    /// Normalizes a raw region label. Returns `None` for blank labels.
    ///
    /// # Examples
    ///
    /// ```
    /// use climate_energy::Region;
    ///
    /// let a = Region::new("  Tamil   Nadu ").unwrap();
    /// let b = Region::new("TAMIL NADU").unwrap();
    /// assert_eq!(a, b);
    /// assert_eq!(a.name(), "Tamil Nadu");
    /// assert!(Region::new("   ").is_none());
    /// ```
    pub fn new(raw: &str) -> Option<Self> {
        let name = raw
            .trim_start_matches('\u{feff}')
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        if name.is_empty() {
            return None;
        }
        let key = name.to_lowercase();
        Some(Self { name, key })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl PartialEq for Region {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Region {}

impl Hash for Region {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl PartialOrd for Region {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Region {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn spelling_variants_hash_to_the_same_key() {
        let mut set = HashSet::new();
        set.insert(Region::new("Andhra Pradesh").unwrap());
        set.insert(Region::new("andhra  pradesh").unwrap());
        set.insert(Region::new("\u{feff}ANDHRA PRADESH\t").unwrap());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn keeps_first_spelling_for_display() {
        let region = Region::new(" West  Bengal").unwrap();
        assert_eq!(region.to_string(), "West Bengal");
        assert_eq!(region.key(), "west bengal");
    }

    #[test]
    fn orders_case_insensitively() {
        let mut regions = vec![
            Region::new("goa").unwrap(),
            Region::new("Bihar").unwrap(),
            Region::new("ASSAM").unwrap(),
        ];
        regions.sort();
        let names: Vec<_> = regions.iter().map(Region::name).collect();
        assert_eq!(names, vec!["ASSAM", "Bihar", "goa"]);
    }
}
