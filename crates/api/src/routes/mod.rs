//! Route handlers for the `/genesis` surface

pub mod data;
pub mod query;
