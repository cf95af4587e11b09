mod interaction_repo;
mod repo_error;
mod site_repo;

pub use interaction_repo::*;
pub use repo_error::RepositoryError;
pub use site_repo::*;
