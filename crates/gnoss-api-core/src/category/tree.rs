//! Category tree
//!
//! Builds parent/child links for a flat [`CategoryDirectory`] in one pass.
//! The tree is immutable once built and can be shared as a snapshot.

use std::collections::HashMap;

use uuid::Uuid;

use super::model::{Category, CategoryDirectory};
use super::name::{path_segments, PATH_SEPARATOR_STR};

/// Forest of categories for one community
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTree {
    scope: String,
    categories: Vec<Category>,
    /// Child indices per category, in directory order
    children: Vec<Vec<usize>>,
    roots: Vec<usize>,
    /// Categories whose parent is not in the directory
    orphans: Vec<usize>,
    index: HashMap<Uuid, usize>,
}

impl CategoryTree {
    /// Build the forest from a flat directory.
    ///
    /// A dangling parent reference is not an error: the category stays in
    /// the flat list but is attached nowhere.
    pub fn build(directory: CategoryDirectory) -> Self {
        let (scope, categories) = directory.into_parts();

        let mut index = HashMap::with_capacity(categories.len());
        for (i, category) in categories.iter().enumerate() {
            // first occurrence wins on duplicate ids
            index.entry(category.id).or_insert(i);
        }

        let mut children = vec![Vec::new(); categories.len()];
        let mut roots = Vec::new();
        let mut orphans = Vec::new();

        for (i, category) in categories.iter().enumerate() {
            match category.parent_id {
                None => roots.push(i),
                Some(parent_id) => match index.get(&parent_id) {
                    Some(&parent) => children[parent].push(i),
                    None => orphans.push(i),
                },
            }
        }

        if !orphans.is_empty() {
            tracing::debug!(
                scope = %scope,
                orphans = orphans.len(),
                "categories with dangling parent references left unattached"
            );
        }

        Self {
            scope,
            categories,
            children,
            roots,
            orphans,
            index,
        }
    }

    /// Community short name
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// All categories in directory order, attached or not
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Top-level categories
    pub fn roots(&self) -> impl Iterator<Item = CategoryNode<'_>> {
        self.roots.iter().map(move |&idx| self.node(idx))
    }

    /// Categories whose parent does not exist in this directory
    pub fn orphans(&self) -> impl Iterator<Item = CategoryNode<'_>> {
        self.orphans.iter().map(move |&idx| self.node(idx))
    }

    /// Get a category by id
    pub fn get(&self, id: &Uuid) -> Option<CategoryNode<'_>> {
        self.index.get(id).map(|&idx| self.node(idx))
    }

    /// Walk a `|`-delimited path from the roots.
    ///
    /// Segments are matched exactly against category names; the first
    /// matching sibling wins. Returns `None` for an empty path.
    pub fn find_path(&self, path: &str) -> Option<CategoryNode<'_>> {
        let segments = path_segments(path);
        let (first, rest) = segments.split_first()?;

        let mut current = self.roots().find(|node| node.name() == *first)?;
        for segment in rest {
            current = current.find_child(segment)?;
        }
        Some(current)
    }

    /// Hierarchical path of a category, root first.
    ///
    /// `None` if the category is unknown or hangs from a dangling parent.
    pub fn path_of(&self, id: &Uuid) -> Option<String> {
        let mut names = Vec::new();
        let mut current = self.get(id)?;

        // bounded by the directory size so a parent cycle cannot loop forever
        for _ in 0..=self.categories.len() {
            names.push(current.name());
            match current.parent() {
                Some(parent) => current = parent,
                None if current.category().is_root() => {
                    names.reverse();
                    return Some(names.join(PATH_SEPARATOR_STR));
                }
                None => return None,
            }
        }
        None
    }

    fn node(&self, idx: usize) -> CategoryNode<'_> {
        CategoryNode { tree: self, idx }
    }
}

/// Borrowed view of one category inside a [`CategoryTree`]
#[derive(Debug, Clone, Copy)]
pub struct CategoryNode<'a> {
    tree: &'a CategoryTree,
    idx: usize,
}

impl<'a> CategoryNode<'a> {
    pub fn category(&self) -> &'a Category {
        &self.tree.categories[self.idx]
    }

    pub fn id(&self) -> Uuid {
        self.category().id
    }

    pub fn name(&self) -> &'a str {
        &self.category().name
    }

    /// Attached parent, if any
    pub fn parent(&self) -> Option<CategoryNode<'a>> {
        let parent_id = self.category().parent_id?;
        self.tree.get(&parent_id)
    }

    /// Direct children in directory order
    pub fn children(&self) -> impl Iterator<Item = CategoryNode<'a>> + 'a {
        let tree = self.tree;
        tree.children[self.idx]
            .iter()
            .map(move |&idx| CategoryNode { tree, idx })
    }

    pub fn has_children(&self) -> bool {
        !self.tree.children[self.idx].is_empty()
    }

    /// First direct child with exactly this name
    pub fn find_child(&self, name: &str) -> Option<CategoryNode<'a>> {
        self.children().find(|child| child.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    fn sample_directory() -> CategoryDirectory {
        CategoryDirectory::new(
            "community",
            vec![
                Category::new(id(1), "Tech"),
                Category::new(id(2), "AI").with_parent(id(1)),
                Category::new(id(3), "Robotics").with_parent(id(1)),
                Category::new(id(4), "Arts"),
                Category::new(id(5), "DeepLearning").with_parent(id(2)),
            ],
        )
    }

    fn child_ids(tree: &CategoryTree, parent: u128) -> Vec<Uuid> {
        tree.get(&id(parent)).unwrap().children().map(|c| c.id()).collect()
    }

    #[test]
    fn test_children_match_parent_pointers() {
        let directory = sample_directory();
        let tree = CategoryTree::build(directory.clone());

        for category in directory.categories() {
            let mut expected: Vec<Uuid> = directory
                .categories()
                .iter()
                .filter(|x| x.parent_id == Some(category.id))
                .map(|x| x.id)
                .collect();
            let mut actual = child_ids(&tree, category.id.as_u128());
            expected.sort();
            actual.sort();
            assert_eq!(actual, expected, "children of {}", category.name);
        }
    }

    #[test]
    fn test_children_keep_directory_order() {
        let tree = CategoryTree::build(sample_directory());
        assert_eq!(child_ids(&tree, 1), vec![id(2), id(3)]);
        let roots: Vec<_> = tree.roots().map(|r| r.name()).collect();
        assert_eq!(roots, vec!["Tech", "Arts"]);
    }

    #[test]
    fn test_build_is_idempotent() {
        let first = CategoryTree::build(sample_directory());
        let second = CategoryTree::build(sample_directory());
        assert_eq!(first, second);
    }

    #[test]
    fn test_dangling_parent_is_not_attached() {
        let directory = CategoryDirectory::new(
            "community",
            vec![
                Category::new(id(1), "A"),
                Category::new(id(2), "Orphan").with_parent(id(99)),
            ],
        );
        let tree = CategoryTree::build(directory);

        assert_eq!(child_ids(&tree, 1), Vec::<Uuid>::new());
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.roots().count(), 1);
        let orphans: Vec<_> = tree.orphans().map(|o| o.id()).collect();
        assert_eq!(orphans, vec![id(2)]);
        assert!(tree.find_path("Orphan").is_none());
        assert!(tree.find_path("A|Orphan").is_none());
        assert!(tree.path_of(&id(2)).is_none());
    }

    #[test]
    fn test_find_path() {
        let tree = CategoryTree::build(sample_directory());
        assert_eq!(tree.find_path("Tech|AI|DeepLearning").unwrap().id(), id(5));
        assert_eq!(tree.find_path("Tech|AI").unwrap().id(), id(2));
        assert_eq!(tree.find_path("|Tech||AI|").unwrap().id(), id(2));
        assert!(tree.find_path("AI").is_none());
        assert!(tree.find_path("Tech|X|DeepLearning").is_none());
        assert!(tree.find_path("").is_none());
    }

    #[test]
    fn test_path_of() {
        let tree = CategoryTree::build(sample_directory());
        assert_eq!(tree.path_of(&id(5)).unwrap(), "Tech|AI|DeepLearning");
        assert_eq!(tree.path_of(&id(4)).unwrap(), "Arts");
        assert!(tree.path_of(&id(42)).is_none());

        let path = tree.path_of(&id(5)).unwrap();
        assert_eq!(tree.find_path(&path).unwrap().id(), id(5));
    }

    #[test]
    fn test_parent_cycle_is_unreachable() {
        let directory = CategoryDirectory::new(
            "community",
            vec![
                Category::new(id(1), "Root"),
                Category::new(id(2), "Loop A").with_parent(id(3)),
                Category::new(id(3), "Loop B").with_parent(id(2)),
            ],
        );
        let tree = CategoryTree::build(directory);
        assert_eq!(tree.roots().count(), 1);
        assert!(tree.path_of(&id(2)).is_none());
    }
}
