//! sea-orm entities for the social service tables.

pub mod microposts;
pub mod relationships;
pub mod users;
