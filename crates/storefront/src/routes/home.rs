//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use tracing::instrument;

use super::{CATEGORIES, CategoryLink};
use crate::filters;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub categories: &'static [CategoryLink],
}

/// Display the home page.
#[instrument]
pub async fn home() -> HomeTemplate {
    HomeTemplate {
        categories: &CATEGORIES,
    }
}
