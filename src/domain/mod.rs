mod interaction;
mod site;
mod user;

pub mod models;
pub mod search;

pub use interaction::*;
pub use site::*;
pub use user::*;
