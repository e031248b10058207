pub mod prelude;

pub mod blogs;
pub mod users;
