pub mod credential;
pub mod feed;
pub mod micropost;
pub mod relationship;
pub mod user;

#[cfg(test)]
pub(crate) mod test_support;
