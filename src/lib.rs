//! Backend for a themeable, reorderable task list: SQLite persistence, task
//! CRUD over HTTP, and a live snapshot feed pushed to connected clients.

pub mod api;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
