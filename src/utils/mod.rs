pub mod app_error;
pub mod email;
pub mod flash;
pub mod form;
pub mod jwt;
pub mod pagination;
pub mod post;
pub mod redirect;
pub mod register;
pub mod session;
pub mod token;
