pub mod admin_page;
pub mod auth;
pub mod health;
pub mod leads;
