pub mod contact;
pub mod openapi;
pub mod status;
