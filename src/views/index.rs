//! Catalog home page

use maud::{html, Markup};

use crate::services::stats::CatalogCounts;

pub fn page(counts: &CatalogCounts) -> Markup {
    super::layout(
        "Local Library Home",
        html! {
            p { "Welcome to the Local Library catalog." }
            h2 { "Dynamic content" }
            p { "The library has the following record counts:" }
            ul.counts {
                li { strong { "Books: " } span #book-count { (counts.books) } }
                li { strong { "Copies: " } span #book-instance-count { (counts.book_instances) } }
                li {
                    strong { "Copies available: " }
                    span #book-instance-available-count { (counts.book_instances_available) }
                }
                li { strong { "Authors: " } span #author-count { (counts.authors) } }
                li { strong { "Genres: " } span #genre-count { (counts.genres) } }
            }
        },
    )
}
