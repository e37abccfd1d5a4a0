use crate::core::domain::{Identifiable, IdentityRef};

pub mod model;

pub trait Book: Identifiable {
    // true iff the given user is the book's owner; anonymous visitors own nothing
    fn is_owned_by(&self, user: Option<&IdentityRef>) -> bool {
        user.map_or(false, |u| *u == self.owner())
    }
}
