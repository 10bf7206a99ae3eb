//! UI module - reusable widgets used by the page views

pub mod components;
