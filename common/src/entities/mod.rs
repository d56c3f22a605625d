pub mod contact_message;
