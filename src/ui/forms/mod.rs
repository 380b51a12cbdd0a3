//! Form rendering module
//!
//! - `field_renderer`: single row rendering (inputs and selects)
//! - `config_form`: the configuration form and its action panel

mod config_form;
mod field_renderer;

pub use config_form::draw as draw_config_form;
