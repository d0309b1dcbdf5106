//! Genre pages

use maud::{html, Markup};

use crate::{
    forms::FormErrors,
    models::{Book, Genre, GenreForm, CATALOG_PREFIX},
};

fn book_list(books: &[Book]) -> Markup {
    html! {
        dl.books {
            @for book in books {
                dt { a href=(book.url()) { (book.title) } }
                dd { (book.summary) }
            }
        }
    }
}

pub fn list(genres: &[Genre]) -> Markup {
    super::layout(
        "Genre List",
        html! {
            @if genres.is_empty() {
                p { "There are no genres." }
            } @else {
                ul.genres {
                    @for genre in genres {
                        li { a href=(genre.url()) { (genre.name) } }
                    }
                }
            }
        },
    )
}

pub fn detail(genre: &Genre, books: &[Book]) -> Markup {
    super::layout(
        &format!("Genre: {}", genre.name),
        html! {
            h2 { "Books" }
            @if books.is_empty() {
                p { "This genre has no books." }
            } @else {
                (book_list(books))
            }
            hr;
            p {
                a href=(format!("{}/update", genre.url())) { "Update genre" }
                " | "
                a href=(format!("{}/delete", genre.url())) { "Delete genre" }
            }
        },
    )
}

pub fn form(title: &str, action: &str, form: &GenreForm, errors: &FormErrors) -> Markup {
    super::layout(
        title,
        html! {
            (super::error_summary(errors))
            form method="POST" action=(action) {
                div.form-group {
                    label for="name" { "Genre:" }
                    input #name type="text" name="name" placeholder="Fantasy, Poetry etc."
                        value=(form.name) required;
                    (super::field_errors(errors, "name"))
                }
                button type="submit" { "Submit" }
            }
        },
    )
}

pub fn delete(genre: &Genre, books: &[Book]) -> Markup {
    super::layout(
        &format!("Delete Genre: {}", genre.name),
        html! {
            @if !books.is_empty() {
                p.blocked {
                    strong { "Delete the following books before attempting to delete this genre." }
                }
                (book_list(books))
            } @else {
                p { "Do you really want to delete this genre?" }
                form method="POST" action=(format!("{}/delete", genre.url())) {
                    input type="hidden" name="genreid" value=(genre.id.to_string());
                    button type="submit" { "Delete" }
                }
            }
            p { a href=(format!("{}/genres", CATALOG_PREFIX)) { "Back to all genres" } }
        },
    )
}
