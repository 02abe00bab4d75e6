#[path = "../common/mod.rs"]
mod common;

mod allocation;
mod contention;
mod lifecycle;
mod record_properties;
