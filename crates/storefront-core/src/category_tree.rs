//! Category Filter Tree
//!
//! Reconciles checkbox clicks on the two-level category tree into
//! checked/active flags and the flat id list sent to the filter endpoint.
//! Every operation returns a new tree; the input is never mutated.

use crate::models::Category;

/// Actions accepted by [`reduce`]
#[derive(Debug, Clone, PartialEq)]
pub enum FilterAction {
    /// Categories fetched from the backend replace the tree wholesale
    Replace(Vec<Category>),
    /// Checkbox click on a category or subcategory
    Toggle(u32),
    /// Expand/collapse a top-level category
    ToggleExpanded(u32),
    /// Reset every checkbox
    ClearAll,
}

/// Tree reducer: `(tree, action) -> tree`
pub fn reduce(tree: &[Category], action: FilterAction) -> Vec<Category> {
    match action {
        FilterAction::Replace(categories) => categories,
        FilterAction::Toggle(id) if !is_selectable(tree, id) => {
            log::debug!("[FILTER] ignoring click on inactive category {}", id);
            tree.to_vec()
        }
        FilterAction::Toggle(id) => toggle_category(tree, id),
        FilterAction::ToggleExpanded(id) => toggle_expanded(tree, id),
        FilterAction::ClearAll => clear_all_filters(tree),
    }
}

/// Find a category or subcategory by id
pub fn find_category(tree: &[Category], id: u32) -> Option<&Category> {
    tree.iter().find_map(|top| {
        if top.id == id {
            Some(top)
        } else {
            top.sub_categories.iter().find(|sub| sub.id == id)
        }
    })
}

/// Whether a checkbox accepts clicks. A subcategory is selectable only
/// while its own family is active.
pub fn is_selectable(tree: &[Category], id: u32) -> bool {
    tree.iter().any(|top| {
        if top.id == id {
            top.is_active
        } else {
            top.is_active && top.sub_categories.iter().any(|sub| sub.id == id && sub.is_active)
        }
    })
}

/// Flip `checked` on the clicked category.
///
/// A top-level click pushes the new value down to all of its subcategories.
/// A subcategory click leaves the parent's flag alone. Afterwards every other
/// top-level category (neither the clicked one nor its parent) becomes active
/// only when all related categories are unchecked.
pub fn toggle_category(tree: &[Category], id: u32) -> Vec<Category> {
    let Some(clicked) = find_category(tree, id) else {
        return tree.to_vec();
    };
    let new_checked = !clicked.checked;
    let parent_id = clicked.parent_id;

    let mut next: Vec<Category> = tree
        .iter()
        .map(|top| {
            let mut top = top.clone();
            if top.id == id {
                top.checked = new_checked;
                for sub in &mut top.sub_categories {
                    sub.checked = new_checked;
                }
            } else if let Some(sub) = top.sub_categories.iter_mut().find(|sub| sub.id == id) {
                sub.checked = new_checked;
            }
            top
        })
        .collect();

    let all_unchecked = related_all_unchecked(&next, id, parent_id);
    for top in &mut next {
        if top.id != id && Some(top.id) != parent_id {
            top.is_active = all_unchecked;
        }
    }
    next
}

/// Categories related to the clicked one are the subcategories sharing its
/// parent. A top-level click relates to its own subcategories, or to itself
/// when it has none.
fn related_all_unchecked(tree: &[Category], id: u32, parent_id: Option<u32>) -> bool {
    match parent_id {
        Some(parent) => tree
            .iter()
            .flat_map(|top| top.sub_categories.iter())
            .filter(|sub| sub.parent_id == Some(parent))
            .all(|sub| !sub.checked),
        None => match tree.iter().find(|top| top.id == id) {
            Some(top) if !top.sub_categories.is_empty() => {
                top.sub_categories.iter().all(|sub| !sub.checked)
            }
            Some(top) => !top.checked,
            None => true,
        },
    }
}

/// Flip the collapse flag of a category
pub fn toggle_expanded(tree: &[Category], id: u32) -> Vec<Category> {
    tree.iter()
        .map(|top| {
            let mut top = top.clone();
            if top.id == id {
                top.expanded = !top.expanded;
            }
            top
        })
        .collect()
}

/// Uncheck and reactivate every category and subcategory
pub fn clear_all_filters(tree: &[Category]) -> Vec<Category> {
    tree.iter()
        .map(|top| {
            let mut top = top.clone();
            top.checked = false;
            top.is_active = true;
            for sub in &mut top.sub_categories {
                sub.checked = false;
                sub.is_active = true;
            }
            top
        })
        .collect()
}

/// Ids of checked subcategories, in tree order.
///
/// Top-level ids are never submitted; only their checked children are.
pub fn derive_category_ids(tree: &[Category]) -> Vec<u32> {
    tree.iter()
        .flat_map(|top| top.sub_categories.iter())
        .filter(|sub| sub.checked)
        .map(|sub| sub.id)
        .collect()
}

/// Display state of a parent derived from its children
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    Unchecked,
    Partial,
    Checked,
}

/// Tri-state of a category for rendering.
///
/// Derived only; it never writes back into `checked`.
pub fn selection_state(category: &Category) -> SelectionState {
    if category.sub_categories.is_empty() {
        return if category.checked {
            SelectionState::Checked
        } else {
            SelectionState::Unchecked
        };
    }
    let checked = category.sub_categories.iter().filter(|sub| sub.checked).count();
    if checked == 0 {
        SelectionState::Unchecked
    } else if checked == category.sub_categories.len() {
        SelectionState::Checked
    } else {
        SelectionState::Partial
    }
}

/// Rows in display order as (category, depth) pairs.
/// Subcategories are listed only under expanded parents.
pub fn flatten_tree(tree: &[Category]) -> Vec<(Category, usize)> {
    let mut result = Vec::new();
    for top in tree {
        result.push((top.clone(), 0));
        if top.expanded {
            for sub in &top.sub_categories {
                result.push((sub.clone(), 1));
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_category(id: u32, parent_id: Option<u32>, subs: Vec<Category>) -> Category {
        Category {
            id,
            name: format!("Category {}", id),
            slug: format!("category-{}", id),
            parent_id,
            sub_categories: subs,
            checked: false,
            expanded: false,
            is_active: true,
        }
    }

    /// 1 -> (11, 12), 2 -> (21), 3 -> ()
    fn sample_tree() -> Vec<Category> {
        vec![
            make_category(
                1,
                None,
                vec![make_category(11, Some(1), vec![]), make_category(12, Some(1), vec![])],
            ),
            make_category(2, None, vec![make_category(21, Some(2), vec![])]),
            make_category(3, None, vec![]),
        ]
    }

    fn top<'a>(tree: &'a [Category], id: u32) -> &'a Category {
        tree.iter().find(|c| c.id == id).unwrap()
    }

    #[test]
    fn test_inactive_family_is_not_selectable() {
        let tree = toggle_category(&sample_tree(), 11);
        assert!(is_selectable(&tree, 1));
        assert!(is_selectable(&tree, 11));
        assert!(is_selectable(&tree, 12));
        assert!(!is_selectable(&tree, 2));
        assert!(!is_selectable(&tree, 21));
        assert!(!is_selectable(&tree, 3));
        assert!(!is_selectable(&tree, 99));
    }

    #[test]
    fn test_reduce_ignores_clicks_on_inactive_categories() {
        let tree = reduce(&sample_tree(), FilterAction::Toggle(11));
        let after = reduce(&tree, FilterAction::Toggle(21));
        assert_eq!(after, tree);
        assert_eq!(derive_category_ids(&after), vec![11]);

        let after = reduce(&tree, FilterAction::Toggle(2));
        assert_eq!(after, tree);
    }

    #[test]
    fn test_top_level_toggle_cascades_to_children() {
        let tree = toggle_category(&sample_tree(), 1);
        let parent = top(&tree, 1);
        assert!(parent.checked);
        assert!(parent.sub_categories.iter().all(|s| s.checked));

        let tree = toggle_category(&tree, 1);
        let parent = top(&tree, 1);
        assert!(!parent.checked);
        assert!(parent.sub_categories.iter().all(|s| !s.checked));
    }

    #[test]
    fn test_subcategory_toggle_does_not_touch_parent() {
        let tree = toggle_category(&sample_tree(), 11);
        let parent = top(&tree, 1);
        assert!(!parent.checked);
        assert!(parent.sub_categories[0].checked);
        assert!(!parent.sub_categories[1].checked);
    }

    #[test]
    fn test_checked_subcategory_deactivates_other_families() {
        let tree = toggle_category(&sample_tree(), 11);
        assert!(top(&tree, 1).is_active);
        assert!(!top(&tree, 2).is_active);
        assert!(!top(&tree, 3).is_active);
    }

    #[test]
    fn test_unchecking_last_subcategory_reactivates_others() {
        let tree = toggle_category(&sample_tree(), 11);
        let tree = toggle_category(&tree, 12);
        assert!(!top(&tree, 2).is_active);

        let tree = toggle_category(&tree, 11);
        assert!(!top(&tree, 2).is_active, "12 is still checked");

        let tree = toggle_category(&tree, 12);
        assert!(top(&tree, 1).is_active);
        assert!(top(&tree, 2).is_active);
        assert!(top(&tree, 3).is_active);
    }

    #[test]
    fn test_parent_exempt_from_mass_rewrite() {
        let mut tree = sample_tree();
        tree[0].is_active = false;
        let tree = toggle_category(&tree, 11);
        assert!(!top(&tree, 1).is_active, "parent flag left untouched");
    }

    #[test]
    fn test_leaf_top_level_toggle_uses_itself() {
        let tree = toggle_category(&sample_tree(), 3);
        assert!(top(&tree, 3).checked);
        assert!(!top(&tree, 1).is_active);
        assert!(!top(&tree, 2).is_active);

        let tree = toggle_category(&tree, 3);
        assert!(top(&tree, 1).is_active);
        assert!(top(&tree, 2).is_active);
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let tree = sample_tree();
        assert_eq!(toggle_category(&tree, 99), tree);
    }

    #[test]
    fn test_derive_category_ids_only_subcategories() {
        let tree = toggle_category(&sample_tree(), 1);
        let tree = toggle_category(&tree, 3);
        let ids = derive_category_ids(&tree);
        assert_eq!(ids, vec![11, 12]);
        assert_eq!(derive_category_ids(&tree), ids);
    }

    #[test]
    fn test_clear_all_filters() {
        let tree = toggle_category(&sample_tree(), 11);
        let tree = toggle_category(&tree, 1);
        let tree = clear_all_filters(&tree);
        for category in &tree {
            assert!(!category.checked);
            assert!(category.is_active);
            for sub in &category.sub_categories {
                assert!(!sub.checked);
                assert!(sub.is_active);
            }
        }
        assert!(derive_category_ids(&tree).is_empty());
    }

    #[test]
    fn test_selection_state() {
        let tree = toggle_category(&sample_tree(), 11);
        assert_eq!(selection_state(top(&tree, 1)), SelectionState::Partial);
        assert_eq!(selection_state(top(&tree, 2)), SelectionState::Unchecked);
        let tree = toggle_category(&tree, 12);
        assert_eq!(selection_state(top(&tree, 1)), SelectionState::Checked);
        // display only
        assert!(!top(&tree, 1).checked);
    }

    #[test]
    fn test_flatten_tree_respects_expanded() {
        let tree = sample_tree();
        assert_eq!(flatten_tree(&tree).len(), 3);

        let tree = reduce(&tree, FilterAction::ToggleExpanded(1));
        let rows = flatten_tree(&tree);
        let ids: Vec<(u32, usize)> = rows.iter().map(|(c, d)| (c.id, *d)).collect();
        assert_eq!(ids, vec![(1, 0), (11, 1), (12, 1), (2, 0), (3, 0)]);
    }
}
