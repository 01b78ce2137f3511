pub mod account;
pub mod hearts;
pub mod reviews;
pub mod search;
pub mod stores;
