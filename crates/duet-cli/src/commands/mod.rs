pub mod compare;
pub mod context;
pub mod demo;
pub mod health;
pub mod output;
