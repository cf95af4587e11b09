mod extractor;

pub use extractor::{AuthUser, USER_ID_HEADER};
