//! Integration tests driving the router in-process.

mod common;

mod auth_tests;
mod lesson_tests;
mod security_tests;
