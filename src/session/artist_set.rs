use serde::Serialize;

/// Maximum number of reference artists in a selection.
pub const MAX_ARTISTS: usize = 3;

/// Ordered, duplicate-free selection of up to [`MAX_ARTISTS`] artist names.
///
/// Names compare case-sensitively. Invalid mutations are ignored rather than
/// reported; the boolean results only tell whether the set changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ArtistSet {
    members: Vec<String>,
}

impl ArtistSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `name` unless it is blank, already present, or the set is full.
    pub fn add(&mut self, name: &str) -> bool {
        if name.trim().is_empty() || self.is_full() || self.contains(name) {
            return false;
        }
        self.members.push(name.to_string());
        true
    }

    /// Removes the artist at `index`, keeping the order of the others.
    pub fn remove(&mut self, index: usize) -> bool {
        if index >= self.members.len() {
            return false;
        }
        self.members.remove(index);
        true
    }

    pub fn clear(&mut self) -> bool {
        let changed = !self.members.is_empty();
        self.members.clear();
        changed
    }

    pub fn is_full(&self) -> bool {
        self.members.len() == MAX_ARTISTS
    }

    pub fn contains(&self, name: &str) -> bool {
        self.members.iter().any(|m| m == name)
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_of(names: &[&str]) -> ArtistSet {
        let mut set = ArtistSet::new();
        for name in names {
            set.add(name);
        }
        set
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let set = set_of(&["Radiohead", "Bjork", "Portishead"]);
        assert_eq!(set.members(), ["Radiohead", "Bjork", "Portishead"]);
        assert!(set.is_full());
    }

    #[test]
    fn test_add_rejects_blank_names() {
        let mut set = ArtistSet::new();
        assert!(!set.add(""));
        assert!(!set.add("   "));
        assert!(set.is_empty());
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut set = set_of(&["Radiohead"]);
        let before = set.clone();

        assert!(!set.add("Radiohead"));
        assert_eq!(set, before);
    }

    #[test]
    fn test_duplicates_are_case_sensitive() {
        let set = set_of(&["Radiohead", "radiohead"]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_add_when_full_is_ignored() {
        let mut set = set_of(&["A", "B", "C"]);
        assert!(!set.add("D"));
        assert_eq!(set.members(), ["A", "B", "C"]);
    }

    #[test]
    fn test_remove_keeps_relative_order() {
        let mut set = set_of(&["A", "B", "C"]);

        assert!(set.remove(1));
        assert_eq!(set.members(), ["A", "C"]);
        assert!(!set.is_full());
    }

    #[test]
    fn test_remove_out_of_bounds_is_ignored() {
        let mut set = set_of(&["A"]);
        assert!(!set.remove(1));
        assert!(!set.remove(usize::MAX));
        assert_eq!(set.members(), ["A"]);
    }

    #[test]
    fn test_clear() {
        let mut set = set_of(&["A", "B"]);
        assert!(set.clear());
        assert!(set.is_empty());
        assert!(!set.clear());
    }

    #[test]
    fn test_random_sequences_keep_invariants() {
        let names = ["A", "B", "C", "D", "A", "", "b"];
        let mut set = ArtistSet::new();
        // Deterministic xorshift so failures are reproducible.
        let mut seed: u32 = 0x9E37_79B9;

        for _ in 0..2_000 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;

            if seed % 3 == 0 {
                set.remove((seed as usize / 3) % 4);
            } else {
                set.add(names[(seed as usize / 3) % names.len()]);
            }

            let members = set.members();
            assert!(members.len() <= MAX_ARTISTS);
            for (i, name) in members.iter().enumerate() {
                assert!(!members[i + 1..].contains(name), "duplicate {name}");
            }
        }
    }
}
