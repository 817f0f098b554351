//! Integration tests for the file manager core.

mod helpers;

mod bulk_test;
mod move_test;
mod search_test;
mod selection_test;
mod session_test;
