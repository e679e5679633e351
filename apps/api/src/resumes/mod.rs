// Resume persistence and the ownership-checked operations served over HTTP.

pub mod handlers;
pub mod service;
pub mod store;
