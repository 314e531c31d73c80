pub mod coordinator;
pub mod shadow;
pub mod solar;
