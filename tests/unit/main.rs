#[path = "../common/mod.rs"]
mod common;

mod offers;
mod orders;
mod registry;
