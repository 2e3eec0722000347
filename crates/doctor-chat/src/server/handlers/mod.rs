pub mod ask;
pub mod status;
