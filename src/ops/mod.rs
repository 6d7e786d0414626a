pub mod analytics;
pub mod board_ops;
pub mod command;
pub mod list_view;
pub mod normalize;
pub mod people_ops;
pub mod search;
pub mod task_ops;
pub mod timeline;
