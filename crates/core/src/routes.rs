//! Routes

use std::fmt;

use crate::{invoices::InvoiceId, session::Role};

const STAFF: &[Role] = &[Role::Administrator, Role::Seller];
const ADMIN: &[Role] = &[Role::Administrator];
const CUSTOMER: &[Role] = &[Role::Customer];

/// Every view the portal can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Public menu, `/`.
    Home,
    /// `/login`.
    Login,
    /// `/register`.
    Register,
    /// Customer order history, `/orders`.
    Orders,
    /// Customer invoices, `/invoices`.
    Invoices,
    /// Printable customer invoice, `/invoices/{id}/print`.
    InvoicePrint(InvoiceId),
    /// `/admin`, shown as the admin order list.
    Admin,
    /// `/admin/orders`.
    AdminOrders,
    /// `/admin/dishes`.
    AdminDishes,
    /// `/admin/customers`.
    AdminCustomers,
    /// `/admin/audit`.
    AdminAudit,
    /// `/admin/billing`.
    AdminBilling,
    /// Printable invoice for staff, `/admin/billing/{id}/print`.
    AdminBillingPrint(InvoiceId),
    /// Anything else.
    NotFound,
}

impl Route {
    /// Resolves a location path. Query strings, fragments and trailing slashes are ignored.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim_end_matches('/');

        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Self::Home,
            ["login"] => Self::Login,
            ["register"] => Self::Register,
            ["orders"] => Self::Orders,
            ["invoices"] => Self::Invoices,
            ["invoices", id, "print"] => id.parse().map_or(Self::NotFound, Self::InvoicePrint),
            ["admin"] => Self::Admin,
            ["admin", "orders"] => Self::AdminOrders,
            ["admin", "dishes"] => Self::AdminDishes,
            ["admin", "customers"] => Self::AdminCustomers,
            ["admin", "audit"] => Self::AdminAudit,
            ["admin", "billing"] => Self::AdminBilling,
            ["admin", "billing", id, "print"] => {
                id.parse().map_or(Self::NotFound, Self::AdminBillingPrint)
            }
            _ => Self::NotFound,
        }
    }

    /// Location path of the view.
    #[must_use]
    pub fn path(self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Login => "/login".to_string(),
            Self::Register => "/register".to_string(),
            Self::Orders => "/orders".to_string(),
            Self::Invoices => "/invoices".to_string(),
            Self::InvoicePrint(id) => format!("/invoices/{id}/print"),
            Self::Admin => "/admin".to_string(),
            Self::AdminOrders => "/admin/orders".to_string(),
            Self::AdminDishes => "/admin/dishes".to_string(),
            Self::AdminCustomers => "/admin/customers".to_string(),
            Self::AdminAudit => "/admin/audit".to_string(),
            Self::AdminBilling => "/admin/billing".to_string(),
            Self::AdminBillingPrint(id) => format!("/admin/billing/{id}/print"),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// The view actually shown for this route.
    #[must_use]
    pub const fn canonical(self) -> Self {
        match self {
            Self::Admin => Self::AdminOrders,
            other => other,
        }
    }

    /// Roles allowed to open the view, `None` for public views.
    #[must_use]
    pub const fn allowed_roles(self) -> Option<&'static [Role]> {
        match self.canonical() {
            Self::Home | Self::Login | Self::Register | Self::NotFound => None,
            Self::Orders | Self::Invoices | Self::InvoicePrint(_) => Some(CUSTOMER),
            Self::AdminDishes | Self::AdminCustomers | Self::AdminAudit => Some(ADMIN),
            Self::Admin
            | Self::AdminOrders
            | Self::AdminBilling
            | Self::AdminBillingPrint(_) => Some(STAFF),
        }
    }

    /// Whether the view is part of the staff console.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(
            self,
            Self::Admin
                | Self::AdminOrders
                | Self::AdminDishes
                | Self::AdminCustomers
                | Self::AdminAudit
                | Self::AdminBilling
                | Self::AdminBillingPrint(_)
        )
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_view() {
        let cases = [
            ("/", Route::Home),
            ("", Route::Home),
            ("/login", Route::Login),
            ("/register/", Route::Register),
            ("/orders?page=2", Route::Orders),
            ("/invoices", Route::Invoices),
            ("/invoices/12/print", Route::InvoicePrint(InvoiceId(12))),
            ("/admin", Route::Admin),
            ("/admin/orders#top", Route::AdminOrders),
            ("/admin/dishes", Route::AdminDishes),
            ("/admin/customers", Route::AdminCustomers),
            ("/admin/audit", Route::AdminAudit),
            ("/admin/billing", Route::AdminBilling),
            ("/admin/billing/3/print", Route::AdminBillingPrint(InvoiceId(3))),
            ("/invoices/abc/print", Route::NotFound),
            ("/menu", Route::NotFound),
        ];

        for (path, expected) in cases {
            assert_eq!(Route::parse(path), expected, "parsing {path:?}");
        }
    }

    #[test]
    fn paths_parse_back_to_their_route() {
        let routes = [
            Route::Home,
            Route::Login,
            Route::Orders,
            Route::InvoicePrint(InvoiceId(7)),
            Route::AdminAudit,
            Route::AdminBillingPrint(InvoiceId(9)),
        ];

        for route in routes {
            assert_eq!(Route::parse(&route.path()), route, "route {route:?}");
        }
    }

    #[test]
    fn admin_alias_shows_the_order_list() {
        assert_eq!(Route::Admin.canonical(), Route::AdminOrders);
        assert_eq!(Route::Admin.allowed_roles(), Route::AdminOrders.allowed_roles());
    }

    #[test]
    fn each_role_can_open_its_landing_view() {
        for role in [Role::Customer, Role::Administrator, Role::Seller] {
            let landing = role.landing();

            assert!(
                landing
                    .allowed_roles()
                    .is_none_or(|allowed| allowed.contains(&role)),
                "{role} can't open {landing}"
            );
        }
    }
}
