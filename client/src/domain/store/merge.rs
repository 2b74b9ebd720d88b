//! Merge rules applied to the canonical list when an action succeeds.
//!
//! These functions are pure; the store decides when to call them.

use std::collections::HashSet;

use crate::domain::EntityId;
use crate::domain::resources::Resource;

/// Outcome of replacing the list with a fetched one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ListReplacement {
    /// Ids dropped because they appeared more than once in the response.
    pub(crate) duplicates: Vec<EntityId>,
}

/// Replace `items` with `fetched`, keeping the first occurrence of any id.
pub(crate) fn replace_list<R: Resource>(items: &mut Vec<R>, fetched: Vec<R>) -> ListReplacement {
    let mut seen = HashSet::with_capacity(fetched.len());
    let mut duplicates = Vec::new();
    items.clear();
    for entity in fetched {
        if seen.insert(entity.id()) {
            items.push(entity);
        } else {
            duplicates.push(entity.id());
        }
    }
    ListReplacement { duplicates }
}

/// How a created entity landed in the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Insertion {
    /// Appended at the end.
    Appended,
    /// An entity with the same id was already present and was replaced.
    Replaced,
}

/// Append a confirmed entity, replacing in place on id collision so the list
/// stays unique.
pub(crate) fn append_created<R: Resource>(items: &mut Vec<R>, created: R) -> Insertion {
    if let Some(slot) = items.iter_mut().find(|entity| entity.id() == created.id()) {
        *slot = created;
        Insertion::Replaced
    } else {
        items.push(created);
        Insertion::Appended
    }
}

/// Replace the element with `id`; a miss leaves `items` untouched.
///
/// Returns whether an element was replaced.
pub(crate) fn replace_edited<R: Resource>(items: &mut [R], id: EntityId, edited: &R) -> bool {
    let Some(slot) = items.iter_mut().find(|entity| entity.id() == id) else {
        return false;
    };
    *slot = edited.clone();
    true
}

/// Replace the detail slot when it holds the edited entity.
pub(crate) fn sync_detail<R: Resource>(detail: &mut Option<R>, id: EntityId, edited: &R) {
    if let Some(current) = detail.as_mut().filter(|current| current.id() == id) {
        *current = edited.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::resources::Shop;
    use rstest::rstest;

    fn shop(id: u64, name: &str) -> Shop {
        Shop {
            id: EntityId::new(id).expect("id"),
            name: name.to_owned(),
            address: String::new(),
            phone: None,
        }
    }

    fn id(raw: u64) -> EntityId {
        EntityId::new(raw).expect("id")
    }

    #[rstest]
    fn fetched_list_replaces_previous_state_verbatim() {
        let mut items = vec![shop(9, "Old")];
        let outcome = replace_list(&mut items, vec![shop(2, "B"), shop(1, "A")]);

        assert!(outcome.duplicates.is_empty());
        assert_eq!(items, vec![shop(2, "B"), shop(1, "A")]);
    }

    #[rstest]
    fn fetched_duplicates_keep_the_first_occurrence() {
        let mut items = Vec::new();
        let outcome = replace_list(&mut items, vec![shop(1, "A"), shop(2, "B"), shop(1, "A2")]);

        assert_eq!(outcome.duplicates, vec![id(1)]);
        assert_eq!(items, vec![shop(1, "A"), shop(2, "B")]);
    }

    #[rstest]
    fn create_appends_in_confirmation_order() {
        let mut items = vec![shop(1, "A")];
        assert_eq!(append_created(&mut items, shop(3, "C")), Insertion::Appended);
        assert_eq!(items.len(), 2);
        assert_eq!(items.last(), Some(&shop(3, "C")));
    }

    #[rstest]
    fn create_collision_replaces_in_place() {
        let mut items = vec![shop(1, "A"), shop(2, "B")];
        assert_eq!(append_created(&mut items, shop(1, "A'")), Insertion::Replaced);
        assert_eq!(items, vec![shop(1, "A'"), shop(2, "B")]);
    }

    #[rstest]
    #[case(2, true, vec![shop(1, "A"), shop(2, "Edited"), shop(3, "C")])]
    #[case(7, false, vec![shop(1, "A"), shop(2, "B"), shop(3, "C")])]
    fn edit_replaces_only_the_matching_element(
        #[case] target: u64,
        #[case] replaced: bool,
        #[case] expected: Vec<Shop>,
    ) {
        let mut items = vec![shop(1, "A"), shop(2, "B"), shop(3, "C")];
        let edited = shop(target, "Edited");

        assert_eq!(replace_edited(&mut items, id(target), &edited), replaced);
        assert_eq!(items, expected);
    }

    #[rstest]
    #[case(Some(shop(2, "B")), Some(shop(2, "Edited")))]
    #[case(Some(shop(1, "A")), Some(shop(1, "A")))]
    #[case(None, None)]
    fn detail_follows_edits_of_the_same_id(
        #[case] initial: Option<Shop>,
        #[case] expected: Option<Shop>,
    ) {
        let mut detail = initial;
        sync_detail(&mut detail, id(2), &shop(2, "Edited"));
        assert_eq!(detail, expected);
    }
}
