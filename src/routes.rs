use axum::{
	extract::{Path, State},
	http::header,
	response::{IntoResponse, Redirect, Response},
	routing::get,
	Form, Router,
};
use maud::Markup;
use tower_cookies::{CookieManagerLayer, Cookies};
use tower_http::trace::TraceLayer;

use crate::books::{self, Submit};
use crate::csrf;
use crate::error::Result;
use crate::export;
use crate::pages;
use crate::sql::Db;
use crate::types::{BookForm, DeleteForm, FieldErrors};

#[derive(Clone)]
pub struct ServerState {
	db: Db,
}

impl ServerState {
	pub fn new(db: Db) -> Self {
		ServerState { db }
	}
}

pub fn router(state: ServerState) -> Router {
	Router::new()
		.route("/", get(|| async { Redirect::to("/Book") }))
		.route("/Book", get(display_all))
		.route("/Book/Index", get(display_all))
		.route("/Book/Create", get(display_create).post(perform_create))
		.route("/Book/Details/:id", get(display_details))
		.route("/Book/Delete/:id", get(display_delete).post(perform_delete))
		.route("/Book/Edit/:id", get(display_edit).post(perform_edit))
		.route("/Book/ExportBooksToExcel", get(export_books))
		.layer(CookieManagerLayer::new())
		.layer(TraceLayer::new_for_http())
		.with_state(state)
}

fn to_listing() -> Response {
	Redirect::to("/Book").into_response()
}

async fn display_all(State(stt): State<ServerState>) -> Result<Markup> {
	let books = books::list(&stt.db).await?;
	Ok(pages::index(&books))
}

async fn display_create(cookies: Cookies) -> Markup {
	let token = csrf::issue(&cookies);
	pages::book_form("Thêm sách", "/Book/Create", &BookForm::default(), &FieldErrors::default(), &token, false)
}

async fn perform_create(
	State(stt): State<ServerState>,
	cookies: Cookies,
	Form(form): Form<BookForm>,
) -> Result<Response> {
	csrf::verify(&cookies, &form.csrf_token)?;

	Ok(match books::create(&stt.db, form).await? {
		Submit::Saved(_) => to_listing(),
		Submit::Invalid(form, errors) => {
			let token = csrf::issue(&cookies);
			pages::book_form("Thêm sách", "/Book/Create", &form, &errors, &token, false).into_response()
		},
	})
}

async fn display_details(
	State(stt): State<ServerState>,
	Path(id): Path<String>,
) -> Result<Markup> {
	let book = books::find(&stt.db, &id).await?;
	Ok(pages::details(&book))
}

async fn display_delete(
	State(stt): State<ServerState>,
	Path(id): Path<String>,
	cookies: Cookies,
) -> Result<Markup> {
	let book = books::find(&stt.db, &id).await?;
	let token = csrf::issue(&cookies);
	Ok(pages::delete_confirm(&book, &token))
}

async fn perform_delete(
	State(stt): State<ServerState>,
	Path(id): Path<String>,
	cookies: Cookies,
	Form(form): Form<DeleteForm>,
) -> Result<Response> {
	csrf::verify(&cookies, &form.csrf_token)?;
	books::delete(&stt.db, &id).await?;
	Ok(to_listing())
}

async fn display_edit(
	State(stt): State<ServerState>,
	Path(id): Path<String>,
	cookies: Cookies,
) -> Result<Markup> {
	let book = books::find(&stt.db, &id).await?;
	let token = csrf::issue(&cookies);
	let action = pages::book_path("Edit", &book.id_book);
	Ok(pages::book_form("Sửa sách", &action, &BookForm::from(&book), &FieldErrors::default(), &token, true))
}

async fn perform_edit(
	State(stt): State<ServerState>,
	Path(id): Path<String>,
	cookies: Cookies,
	Form(form): Form<BookForm>,
) -> Result<Response> {
	csrf::verify(&cookies, &form.csrf_token)?;

	Ok(match books::edit(&stt.db, &id, form).await? {
		Submit::Saved(_) => to_listing(),
		Submit::Invalid(form, errors) => {
			let token = csrf::issue(&cookies);
			let action = pages::book_path("Edit", &id);
			pages::book_form("Sửa sách", &action, &form, &errors, &token, true).into_response()
		},
	})
}

async fn export_books(State(stt): State<ServerState>) -> Result<Response> {
	let books = books::list(&stt.db).await?;
	let bytes = export::books_to_xlsx(&books)?;
	tracing::info!(rows = books.len(), "exported books");

	let disposition = format!("attachment; filename=\"{}\"", export::FILE_NAME);
	Ok((
		[
			(header::CONTENT_TYPE, export::MIME_TYPE.to_string()),
			(header::CONTENT_DISPOSITION, disposition),
		],
		bytes,
	).into_response())
}
