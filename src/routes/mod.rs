pub(crate) mod error;
pub(crate) mod interactions;
pub(crate) mod search;
pub(crate) mod sites;

pub(crate) use error::ApiError;
