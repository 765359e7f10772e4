//! SeaORM entities for the aggregate store.

pub mod post;
