//! Domain models for Freshkeep.
//!
//! These are validated domain objects, kept separate from the database row
//! types in [`crate::db`] and from the GraphQL object types in
//! [`crate::graphql`].

pub mod household;
pub mod item;
pub mod shopping;
pub mod user;

pub use household::Household;
pub use item::{ApplianceItem, Item, ItemChanges, NewItem};
pub use shopping::{ShoppingList, ShoppingListItem};
pub use user::{NewUser, User};
