//! Customer accounts, as managed by administrators.

use crate::session::{AccountStatus, NationalId, Role, UserProfile};

/// Users holding the customer role, in backend order.
pub fn customers_only(users: impl IntoIterator<Item = UserProfile>) -> Vec<UserProfile> {
    users
        .into_iter()
        .filter(|user| user.role() == Role::Customer)
        .collect()
}

/// Status an account moves to when toggled. Accounts without a status become active.
#[must_use]
pub fn toggled_status(current: Option<AccountStatus>) -> AccountStatus {
    match current {
        Some(AccountStatus::Active) => AccountStatus::Inactive,
        Some(AccountStatus::Inactive) | None => AccountStatus::Active,
    }
}

/// Sets the status of customer `id`, returning the status it had.
///
/// Returns `None` when no customer matches.
pub fn apply_status(
    customers: &mut [UserProfile],
    id: &NationalId,
    status: Option<AccountStatus>,
) -> Option<Option<AccountStatus>> {
    customers
        .iter_mut()
        .find(|customer| &customer.national_id == id)
        .map(|customer| std::mem::replace(&mut customer.status, status))
}

#[cfg(test)]
mod tests {
    use crate::session::fixtures::profile;

    use super::*;

    #[test]
    fn keeps_only_customers() {
        let users = vec![
            profile(Role::Customer),
            profile(Role::Administrator),
            profile(Role::Seller),
        ];

        let customers = customers_only(users);

        assert_eq!(customers.len(), 1);
        assert!(customers.iter().all(|user| user.role() == Role::Customer));
    }

    #[test]
    fn toggling_flips_between_active_and_inactive() {
        assert_eq!(toggled_status(Some(AccountStatus::Active)), AccountStatus::Inactive);
        assert_eq!(toggled_status(Some(AccountStatus::Inactive)), AccountStatus::Active);
        assert_eq!(toggled_status(None), AccountStatus::Active);
    }

    #[test]
    fn apply_then_revert_restores_the_original() {
        let original = vec![profile(Role::Customer)];
        let mut customers = original.clone();
        let id = NationalId::new("1712345678");

        let previous = apply_status(&mut customers, &id, Some(AccountStatus::Inactive));

        assert_eq!(previous, Some(Some(AccountStatus::Active)));
        assert_ne!(customers, original);

        apply_status(&mut customers, &id, previous.flatten());

        assert_eq!(customers, original);
        assert_eq!(
            apply_status(&mut customers, &NationalId::new("0"), None),
            None
        );
    }
}
