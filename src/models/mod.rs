pub mod blog;
pub mod user;

pub use blog::{Author, Blog, BlogChanges, NewBlog, TagsInput, normalize_tags, slugify};
pub use user::{NewUser, User};
