//! Computed display names for categories and products.

use std::collections::{HashMap, HashSet};

use crate::id::CategoryId;


/// Separator placed between ancestor display names of a category.
pub const CATEGORY_LINEAGE_SEPARATOR: &str = " > ";


/// `[<identifier>] <name>`, or just `<name>` if the record has no identifier.
pub fn identified_name(identifier: Option<&str>, name: &str) -> String {
    match identifier {
        Some(identifier) => format!("[{}] {}", identifier, name),
        None => name.to_string(),
    }
}

/// Display name of a product: `[<identifier>] <name>`.
pub fn product_display_name(identifier: Option<&str>, name: &str) -> String {
    identified_name(identifier, name)
}

/// Display name of a category, given its lineage as
/// `(identifier, name)` pairs ordered from the root down to the category itself.
pub fn category_display_name<'a, I>(lineage_from_root: I) -> String
where
    I: IntoIterator<Item = (Option<&'a str>, &'a str)>,
{
    lineage_from_root
        .into_iter()
        .map(|(identifier, name)| identified_name(identifier, name))
        .collect::<Vec<_>>()
        .join(CATEGORY_LINEAGE_SEPARATOR)
}



#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CategoryLineageEntry {
    pub parent_id: Option<CategoryId>,
    pub identifier: Option<String>,
    pub name: String,
}


/// An in-memory view of the category tree, used to compute
/// display names and to detect parent cycles without
/// issuing one query per ancestor.
#[derive(Clone, Debug, Default)]
pub struct CategoryLineage {
    entries: HashMap<CategoryId, CategoryLineageEntry>,
}

impl CategoryLineage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category_id: CategoryId, entry: CategoryLineageEntry) {
        self.entries.insert(category_id, entry);
    }

    pub fn get(&self, category_id: CategoryId) -> Option<&CategoryLineageEntry> {
        self.entries.get(&category_id)
    }

    /// Returns the chain of entries from the root ancestor down to `category_id`.
    ///
    /// Walking stops at a missing parent or at the first repeated category,
    /// so a corrupted tree can never loop forever.
    pub fn chain_from_root(&self, category_id: CategoryId) -> Vec<&CategoryLineageEntry> {
        let mut chain = Vec::new();
        let mut visited = HashSet::new();

        let mut current_id = Some(category_id);
        while let Some(id) = current_id {
            if !visited.insert(id) {
                break;
            }

            let Some(entry) = self.entries.get(&id) else {
                break;
            };

            chain.push(entry);
            current_id = entry.parent_id;
        }

        chain.reverse();
        chain
    }

    pub fn display_name(&self, category_id: CategoryId) -> Option<String> {
        if !self.entries.contains_key(&category_id) {
            return None;
        }

        Some(category_display_name(
            self.chain_from_root(category_id)
                .into_iter()
                .map(|entry| (entry.identifier.as_deref(), entry.name.as_str())),
        ))
    }

    pub fn parent_name(&self, category_id: CategoryId) -> Option<&str> {
        let parent_id = self.entries.get(&category_id)?.parent_id?;

        self.entries
            .get(&parent_id)
            .map(|parent| parent.name.as_str())
    }

    /// Returns `true` if setting the parent of `category_id` to `new_parent_id`
    /// would make the category its own ancestor.
    pub fn would_create_cycle(&self, category_id: CategoryId, new_parent_id: CategoryId) -> bool {
        let mut visited = HashSet::new();

        let mut current_id = Some(new_parent_id);
        while let Some(id) = current_id {
            if id == category_id {
                return true;
            }

            if !visited.insert(id) {
                return false;
            }

            current_id = self.entries.get(&id).and_then(|entry| entry.parent_id);
        }

        false
    }
}

impl FromIterator<(CategoryId, CategoryLineageEntry)> for CategoryLineage {
    fn from_iter<T: IntoIterator<Item = (CategoryId, CategoryLineageEntry)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}



#[cfg(test)]
mod test {
    use super::*;

    fn entry(parent_id: Option<CategoryId>, identifier: &str, name: &str) -> CategoryLineageEntry {
        CategoryLineageEntry {
            parent_id,
            identifier: Some(identifier.to_string()),
            name: name.to_string(),
        }
    }

    #[test]
    fn identified_name_falls_back_to_plain_name() {
        assert_eq!(identified_name(Some("ab-cd-ef"), "Shoes"), "[ab-cd-ef] Shoes");
        assert_eq!(identified_name(None, "Shoes"), "Shoes");
        assert_eq!(product_display_name(Some("4be/a1"), "Boot"), "[4be/a1] Boot");
    }

    #[test]
    fn category_display_name_joins_the_lineage() {
        let display_name = category_display_name([
            (Some("aa-bb-cc"), "Clothing"),
            (None, "Shoes"),
            (Some("11-22-33"), "Sneakers"),
        ]);

        assert_eq!(
            display_name,
            "[aa-bb-cc] Clothing > Shoes > [11-22-33] Sneakers"
        );
    }

    #[test]
    fn lineage_resolves_display_and_parent_names() {
        let root = CategoryId::generate();
        let child = CategoryId::generate();

        let lineage = CategoryLineage::from_iter([
            (root, entry(None, "aa-bb-cc", "Clothing")),
            (child, entry(Some(root), "dd-ee-ff", "Shoes")),
        ]);

        assert_eq!(
            lineage.display_name(child).as_deref(),
            Some("[aa-bb-cc] Clothing > [dd-ee-ff] Shoes")
        );
        assert_eq!(lineage.parent_name(child), Some("Clothing"));
        assert_eq!(lineage.parent_name(root), None);
        assert_eq!(lineage.display_name(CategoryId::generate()), None);
    }

    #[test]
    fn lineage_survives_a_corrupted_cycle() {
        let first = CategoryId::generate();
        let second = CategoryId::generate();

        let lineage = CategoryLineage::from_iter([
            (first, entry(Some(second), "aa-aa-aa", "First")),
            (second, entry(Some(first), "bb-bb-bb", "Second")),
        ]);

        assert_eq!(lineage.chain_from_root(first).len(), 2);
    }

    #[test]
    fn cycle_detection_finds_descendants() {
        let root = CategoryId::generate();
        let child = CategoryId::generate();
        let grandchild = CategoryId::generate();
        let unrelated = CategoryId::generate();

        let lineage = CategoryLineage::from_iter([
            (root, entry(None, "aa-aa-aa", "Root")),
            (child, entry(Some(root), "bb-bb-bb", "Child")),
            (grandchild, entry(Some(child), "cc-cc-cc", "Grandchild")),
            (unrelated, entry(None, "dd-dd-dd", "Unrelated")),
        ]);

        assert!(lineage.would_create_cycle(root, grandchild));
        assert!(lineage.would_create_cycle(root, root));
        assert!(!lineage.would_create_cycle(grandchild, unrelated));
        assert!(!lineage.would_create_cycle(unrelated, root));
    }
}
