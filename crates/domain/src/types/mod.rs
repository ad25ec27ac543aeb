//! Domain data types

pub mod orders;
pub mod query;
pub mod session;
pub mod user;

pub use orders::*;
pub use query::*;
pub use session::*;
pub use user::*;
