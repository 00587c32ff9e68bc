// HTTP surface: view models, forms and redirects

pub mod admin;
pub mod assignments;
pub mod auth;
pub mod dashboard;
pub mod exercises;
pub mod favorites;
pub mod health;
pub mod page;
pub mod profile;
pub mod progress;
pub mod routes;
pub mod routines;
pub mod trainers;
pub mod workouts;

pub use page::{AppState, FormPage, Notice, NoticeBoard, NoticeLevel, Page, Redirect, FORM_ERRORS_KEY};
pub use routes::create_routes;
