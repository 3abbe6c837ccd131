pub mod records;
pub mod scope;
