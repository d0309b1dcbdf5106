//! Book pages

use maud::{html, Markup};

use crate::{
    forms::FormErrors,
    models::{BookDetail, BookForm, BookInstance, BookListing, InstanceStatus, CATALOG_PREFIX},
    services::books::{BookDeletePreview, FormChoices},
};

fn instance_list(instances: &[BookInstance]) -> Markup {
    html! {
        ul.instances {
            @for instance in instances {
                li {
                    @let class = match instance.status {
                        InstanceStatus::Available => "text-success",
                        InstanceStatus::Maintenance => "text-danger",
                        _ => "text-warning",
                    };
                    span class=(class) { (instance.status.as_str()) }
                    " "
                    span.imprint { (instance.imprint) }
                    @if instance.status != InstanceStatus::Available && instance.due_back.is_some() {
                        " (Due: " (instance.due_back_formatted()) ")"
                    }
                }
            }
        }
    }
}

pub fn list(books: &[BookListing]) -> Markup {
    super::layout(
        "Book List",
        html! {
            @if books.is_empty() {
                p { "There are no books." }
            } @else {
                ul.books {
                    @for listing in books {
                        li {
                            a href=(listing.book.url()) { (listing.book.title) }
                            @if let Some(author) = &listing.author {
                                " (" (author.name()) ")"
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn detail(detail: &BookDetail) -> Markup {
    let book = &detail.book;
    super::layout(
        &format!("Title: {}", book.title),
        html! {
            p {
                strong { "Author: " }
                @match &detail.author {
                    Some(author) => {
                        a href=(author.url()) { (author.name()) }
                    },
                    None => { "Unknown" },
                }
            }
            p { strong { "Summary: " } (book.summary) }
            p { strong { "ISBN: " } (book.isbn) }
            p {
                strong { "Genre: " }
                @for (i, genre) in detail.genres.iter().enumerate() {
                    @if i > 0 { ", " }
                    a href=(genre.url()) { (genre.name) }
                }
            }
            h2 { "Copies" }
            @if detail.instances.is_empty() {
                p { "There are no copies of this book in the library." }
            } @else {
                (instance_list(&detail.instances))
            }
            hr;
            p {
                a href=(format!("{}/update", book.url())) { "Update book" }
                " | "
                a href=(format!("{}/delete", book.url())) { "Delete book" }
            }
        },
    )
}

/// Create/update form with the author picker and genre checkboxes; genres
/// selected in `form` are checked
pub fn form(
    title: &str,
    action: &str,
    form: &BookForm,
    choices: &FormChoices,
    errors: &FormErrors,
) -> Markup {
    let selected_author = form.author_id();
    let selected_genres = form.genre_ids();

    super::layout(
        title,
        html! {
            (super::error_summary(errors))
            form method="POST" action=(action) {
                div.form-group {
                    label for="title" { "Title:" }
                    input #title type="text" name="title" placeholder="Name of book"
                        value=(form.title) required;
                    (super::field_errors(errors, "title"))
                }
                div.form-group {
                    label for="author" { "Author:" }
                    select #author name="author" required {
                        option value="" { "--Please select an author--" }
                        @for author in &choices.authors {
                            option value=(author.id.to_string()) selected[selected_author == Some(author.id)] {
                                (author.name())
                            }
                        }
                    }
                    (super::field_errors(errors, "author"))
                }
                div.form-group {
                    label for="summary" { "Summary:" }
                    textarea #summary name="summary" placeholder="Summary" required { (form.summary) }
                    (super::field_errors(errors, "summary"))
                }
                div.form-group {
                    label for="isbn" { "ISBN:" }
                    input #isbn type="text" name="isbn" placeholder="ISBN13" value=(form.isbn) required;
                    (super::field_errors(errors, "isbn"))
                }
                div.form-group {
                    label { "Genre:" }
                    @for genre in &choices.genres {
                        @let input_id = format!("genre-{}", genre.id);
                        span.genre-choice {
                            input id=(input_id) type="checkbox" name="genre" value=(genre.id.to_string())
                                checked[selected_genres.contains(&genre.id)];
                            label for=(input_id) { (genre.name) }
                        }
                    }
                    (super::field_errors(errors, "genre"))
                }
                button type="submit" { "Submit" }
            }
        },
    )
}

/// Delete confirmation listing the copies that are removed with the book
pub fn delete(preview: &BookDeletePreview) -> Markup {
    let book = &preview.book;
    super::layout(
        &format!("Delete Book: {}", book.title),
        html! {
            p { (book.summary) }
            @if !preview.instances.is_empty() {
                p { "The following copies are deleted with this book:" }
                (instance_list(&preview.instances))
            }
            p { "Do you really want to delete this book?" }
            form method="POST" action=(format!("{}/delete", book.url())) {
                input type="hidden" name="bookid" value=(book.id.to_string());
                button type="submit" { "Delete" }
            }
            p { a href=(format!("{}/books", CATALOG_PREFIX)) { "Back to all books" } }
        },
    )
}
