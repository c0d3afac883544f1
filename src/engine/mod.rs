pub mod builder;
pub mod gitlog;
pub mod matrix;
pub mod recency;
pub mod recommend;
pub mod registry;
pub mod team;
pub mod window;
