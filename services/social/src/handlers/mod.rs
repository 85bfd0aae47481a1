pub mod cookie;
pub mod current_user;
pub mod feed;
pub mod micropost;
pub mod relationship;
pub mod session;
pub mod user;
