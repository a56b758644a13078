//! Templates: parametrised chains and the catalog they are browsed from.
//!
//! [`engine`] turns a [`Template`](fleetops_domain::template::Template) into a
//! concrete chain; [`catalog`] filters, searches and orders template lists.

pub mod catalog;
pub mod engine;

pub use catalog::{
    CategoryInfo, filter_by_category, group_by_category, search, sort_by_relevance,
    template_categories,
};
pub use engine::{TemplateEngine, TemplateError};
