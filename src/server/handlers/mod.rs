pub mod catalog;
pub mod drafts;
pub mod portal;
