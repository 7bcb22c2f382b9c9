//! # nutriform-html
//!
//! Materialises nutriform state as HTML fragments.
//!
//! The core produces presentation-agnostic state: rendered report lines,
//! flow states, toasts, the wizard. This crate turns them into markup, the
//! way the original page did:
//!
//! ```rust,ignore
//! use nutriform::{Session, ThemePreference, nutrient_form};
//! use nutriform_html::{HtmlOptions, to_html};
//!
//! let session = Session::new(nutrient_form()?, ThemePreference::default());
//! let page = to_html(&session, &HtmlOptions::new().with_title("Nutrient Recommendations"));
//! ```
//!
//! For surfaces that cannot show HTML, `markup_to_text` flattens the
//! server's report markup into plain lines.

mod generator;
pub use generator::{
    HtmlOptions, INDENT_PX, comparison_html, escape_html, recommendations_html, render_lines_html,
    to_html, toast_html,
};

mod text;
pub use text::markup_to_text;
