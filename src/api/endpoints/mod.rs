pub mod dashboard;
pub mod export;
pub mod health;
pub mod logs;
pub mod recommendations;
pub mod reports;
pub mod summary;
