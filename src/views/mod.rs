//! HTML pages rendered with Maud.
//!
//! One function per entity and action (`authors::list`, `books::form`, ...).
//! Every interpolated value is escaped by Maud, so stored text is never
//! escaped ahead of time.

pub mod authors;
pub mod books;
pub mod error;
pub mod genres;
pub mod index;

use maud::{html, Markup, DOCTYPE};

use crate::{forms::FormErrors, models::CATALOG_PREFIX};

/// Page shell with the catalog navigation sidebar
pub fn layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " | Local Library" }
            }
            body {
                nav.sidebar {
                    ul {
                        li { a href=(CATALOG_PREFIX) { "Home" } }
                        li { a href=(format!("{}/books", CATALOG_PREFIX)) { "All books" } }
                        li { a href=(format!("{}/authors", CATALOG_PREFIX)) { "All authors" } }
                        li { a href=(format!("{}/genres", CATALOG_PREFIX)) { "All genres" } }
                    }
                    hr;
                    ul {
                        li { a href=(format!("{}/authors/create", CATALOG_PREFIX)) { "Create new author" } }
                        li { a href=(format!("{}/genres/create", CATALOG_PREFIX)) { "Create new genre" } }
                        li { a href=(format!("{}/books/create", CATALOG_PREFIX)) { "Create new book" } }
                    }
                }
                main.content {
                    h1 { (title) }
                    (content)
                }
            }
        }
    }
}

/// Summary of every validation message, shown above a re-rendered form
pub fn error_summary(errors: &FormErrors) -> Markup {
    html! {
        @if !errors.is_empty() {
            ul.errors {
                @for error in errors.iter() {
                    li data-field=(error.field) { (error.message) }
                }
            }
        }
    }
}

/// Messages for a single field, placed next to its input
pub fn field_errors(errors: &FormErrors, field: &str) -> Markup {
    html! {
        @for message in errors.for_field(field) {
            span.field-error { (message) }
        }
    }
}
