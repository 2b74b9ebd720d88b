//! Role-based view filter.
//!
//! Managers see only entities scoped to their assigned resources; every other
//! role sees the full list. The filter is recomputed on every read so a role
//! or assignment change is reflected immediately.

use super::resources::Resource;
use super::{Actor, Role};

/// Whether `actor` may see `entity`.
pub fn is_visible<R: Resource>(entity: &R, actor: &Actor) -> bool {
    match actor.role() {
        Role::Manager => actor.is_assigned(entity.scope_id()),
        Role::Admin | Role::Staff => true,
    }
}

/// Entities of `items` visible to `actor`, in their original order.
///
/// # Examples
/// ```
/// use shopdesk::domain::resources::Shop;
/// use shopdesk::domain::{Actor, EntityId, Role, visibility};
///
/// let id = |raw| EntityId::new(raw).unwrap();
/// let shops: Vec<Shop> = (1..=3)
///     .map(|raw| Shop { id: id(raw), name: format!("Shop {raw}"), address: String::new(), phone: None })
///     .collect();
/// let manager = Actor::new(id(9), "Mina", "mina@example.com", Role::Manager, [id(3)]);
///
/// let visible = visibility::visible(&shops, &manager);
/// assert_eq!(visible.len(), 1);
/// assert_eq!(visible[0].id, id(3));
/// ```
pub fn visible<R: Resource>(items: &[R], actor: &Actor) -> Vec<R> {
    items
        .iter()
        .filter(|entity| is_visible(*entity, actor))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EntityId;
    use crate::domain::resources::{Expense, Shop};
    use crate::domain::Amount;
    use crate::test_support::{actor, id, shop};
    use rstest::{fixture, rstest};

    #[fixture]
    fn shops() -> Vec<Shop> {
        (1..=5).map(|raw| shop(raw, "Shop")).collect()
    }

    fn ids(items: &[Shop]) -> Vec<EntityId> {
        items.iter().map(|item| item.id).collect()
    }

    #[rstest]
    fn manager_sees_assigned_ids_in_original_order(shops: Vec<Shop>) {
        let manager = actor(9, Role::Manager, &[5, 2]);

        assert_eq!(ids(&visible(&shops, &manager)), vec![id(2), id(5)]);
    }

    #[rstest]
    #[case(Role::Admin)]
    #[case(Role::Staff)]
    fn other_roles_see_the_input_unchanged(shops: Vec<Shop>, #[case] role: Role) {
        let viewer = actor(9, role, &[2]);

        assert_eq!(visible(&shops, &viewer), shops);
    }

    #[rstest]
    fn manager_without_assignment_sees_nothing(shops: Vec<Shop>) {
        let manager = actor(9, Role::Manager, &[]);

        assert!(visible(&shops, &manager).is_empty());
    }

    #[rstest]
    fn shop_owned_records_scope_through_their_shop() {
        let expense = Expense {
            id: id(40),
            shop_id: id(2),
            user_id: id(9),
            amount: Amount::new(15),
            message: "Mop".to_owned(),
        };

        assert!(is_visible(&expense, &actor(9, Role::Manager, &[2])));
        assert!(!is_visible(&expense, &actor(9, Role::Manager, &[40])));
    }
}
