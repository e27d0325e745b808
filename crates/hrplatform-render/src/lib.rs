//! hrplatform-render: HTML/SVG generation for the human rights atlas.
//!
//! Every renderer is a pure function from engine state and data to markup;
//! [`site::write_site`] assembles them into a static site directory.

pub mod html;
pub mod pages;
pub mod site;
pub mod timeline;
pub mod web;
