pub mod class_model;
pub mod customer_model;
pub mod lesson_model;
pub mod lesson_type_model;
pub mod notification;
pub mod subscription_model;
pub mod timeline_entry_model;
pub mod user_model;
