//! Site access resolver implementations.

#[cfg(test)]
mod mock;
mod postgres;

#[cfg(test)]
pub use mock::MockAccessResolver;
pub use postgres::PgSiteAccessResolver;
