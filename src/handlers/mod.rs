pub mod auth;
pub mod issues;
pub mod pages;
pub mod uploads;
