//! Author pages

use maud::{html, Markup};

use crate::{
    forms::FormErrors,
    models::{Author, AuthorForm, Book, CATALOG_PREFIX},
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

pub fn list(authors: &[Author]) -> Markup {
    super::layout(
        "Author List",
        html! {
            @if authors.is_empty() {
                p { "There are no authors." }
            } @else {
                ul.authors {
                    @for author in authors {
                        li {
                            a href=(author.url()) { (author.name()) }
                            @let lifespan = author.lifespan();
                            @if !lifespan.is_empty() { " (" (lifespan) ")" }
                        }
                    }
                }
            }
        },
    )
}

pub fn detail(author: &Author, books: &[Book]) -> Markup {
    super::layout(
        &format!("Author: {}", author.name()),
        html! {
            p.lifespan { (author.lifespan()) }
            h2 { "Books" }
            @if books.is_empty() {
                p { "This author has no books." }
            } @else {
                (book_list(books))
            }
            hr;
            p {
                a href=(format!("{}/update", author.url())) { "Update author" }
                " | "
                a href=(format!("{}/delete", author.url())) { "Delete author" }
            }
        },
    )
}

/// Create/update form; `action` is the URL the form posts to
pub fn form(title: &str, action: &str, form: &AuthorForm, errors: &FormErrors) -> Markup {
    super::layout(
        title,
        html! {
            (super::error_summary(errors))
            form method="POST" action=(action) {
                div.form-group {
                    label for="first_name" { "First Name:" }
                    input #first_name type="text" name="first_name" placeholder="First name"
                        value=(form.first_name) required;
                    (super::field_errors(errors, "first_name"))
                }
                div.form-group {
                    label for="last_name" { "Last Name:" }
                    input #last_name type="text" name="last_name" placeholder="Last name"
                        value=(form.last_name) required;
                    (super::field_errors(errors, "last_name"))
                }
                div.form-group {
                    label for="date_of_birth" { "Date of birth:" }
                    input #date_of_birth type="date" name="date_of_birth"
                        value=[form.date_of_birth.as_deref()];
                    (super::field_errors(errors, "date_of_birth"))
                }
                div.form-group {
                    label for="date_of_death" { "Date of death:" }
                    input #date_of_death type="date" name="date_of_death"
                        value=[form.date_of_death.as_deref()];
                    (super::field_errors(errors, "date_of_death"))
                }
                button type="submit" { "Submit" }
            }
        },
    )
}

/// Delete confirmation; lists the books that block the delete, if any
pub fn delete(author: &Author, books: &[Book]) -> Markup {
    super::layout(
        &format!("Delete Author: {}", author.name()),
        html! {
            p.lifespan { (author.lifespan()) }
            @if !books.is_empty() {
                p.blocked {
                    strong { "Delete the following books before attempting to delete this author." }
                }
                (book_list(books))
            } @else {
                p { "Do you really want to delete this author?" }
                form method="POST" action=(format!("{}/delete", author.url())) {
                    input type="hidden" name="authorid" value=(author.id.to_string());
                    button type="submit" { "Delete" }
                }
            }
            p { a href=(format!("{}/authors", CATALOG_PREFIX)) { "Back to all authors" } }
        },
    )
}
