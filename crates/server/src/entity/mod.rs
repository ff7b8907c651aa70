pub mod admin_user;
pub mod question;
pub mod subject;
