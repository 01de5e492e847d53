pub mod class_repository;
pub mod lesson_repository;
pub mod notification_store;
pub mod timeline_entry_repository;
pub mod user_repository;
