//! Route guard.
//!
//! `/login` and `/register` are the only routes open without a session.
//! Everything else requires one, and a visitor who already has a session is
//! sent home from the public routes.

pub const LOGIN_ROUTE: &str = "/login";
pub const REGISTER_ROUTE: &str = "/register";
pub const HOME_ROUTE: &str = "/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Proceed,
    Redirect(&'static str),
}

pub fn is_public(route: &str) -> bool {
    route.starts_with(LOGIN_ROUTE) || route.starts_with(REGISTER_ROUTE)
}

pub fn check(route: &str, logged_in: bool) -> Navigation {
    match (is_public(route), logged_in) {
        (false, false) => Navigation::Redirect(LOGIN_ROUTE),
        (true, true) => Navigation::Redirect(HOME_ROUTE),
        _ => Navigation::Proceed,
    }
}
