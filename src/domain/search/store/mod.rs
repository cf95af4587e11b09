//! Search executor implementations.

#[cfg(test)]
mod mock;
mod postgres;

#[cfg(test)]
pub use mock::MockInteractionStore;
pub use postgres::PgInteractionStore;
