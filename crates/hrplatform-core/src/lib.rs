//! hrplatform-core: Data model, loaders, and view engines.
//!
//! This crate holds everything the human rights atlas computes: the JSON
//! data model and its loader, the timeline, relationship diagram and quiz
//! engines, and the persisted progress store. Rendering lives in
//! `hrplatform-render`.

pub mod app;
pub mod catalog;
pub mod config;
pub mod error;
pub mod loader;
pub mod model;
pub mod notify;
pub mod progress;
pub mod quiz;
pub mod router;
pub mod search;
pub mod timeline;
pub mod tracker;
pub mod validate;
pub mod web;
