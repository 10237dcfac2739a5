//! Penpaper Application
//!
//! Windowed host for papers: every paper gets its own window, prompts show as
//! modal dialogs inside it and key presses are routed to the paper's
//! bindings.
//!
//! The drawing program runs on its own thread while the event loop owns the
//! main thread:
//!
//! ```no_run
//! use penpaper_app::{run, AppConfig};
//! use penpaper_core::{PaperConfig, Pen};
//!
//! run(AppConfig::default(), |host| {
//!     let paper = host.open_paper(PaperConfig::default()).unwrap();
//!     let mut pen = Pen::new(&paper).unwrap();
//!     pen.down();
//!     pen.draw_rect(100.0, 50.0).unwrap();
//! })
//! .unwrap();
//! ```

mod app;
mod dialog;
mod display;
mod event_handler;

pub use app::{run, AppConfig, Host, HostError};
