pub mod commit;
pub mod developer;
pub mod recommendation;
pub mod report;
pub mod request;
