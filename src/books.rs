//! Book catalog operations. Handlers in `routes` only translate these results
//! into pages and redirects.

use tracing::{debug, info, instrument, warn};

use crate::error::{AppError, Result};
use crate::sql::Db;
use crate::types::{is_sentinel_id, Book, BookForm, FieldErrors, DUPLICATE_ID, FIELD_ID};

/// Outcome of a create or edit submission that did not fail outright.
#[derive(Debug)]
pub enum Submit {
	Saved(Book),
	/// Nothing was written; show the form again with these messages.
	Invalid(BookForm, FieldErrors),
}

pub async fn list(db: &Db) -> Result<Vec<Book>> {
	db.books().all().await
}

#[instrument(level = "info", skip_all, fields(id = %form.id()))]
pub async fn create(db: &Db, form: BookForm) -> Result<Submit> {
	if db.books().exists(form.id()).await? {
		debug!("duplicate book id");
		return Ok(Submit::Invalid(form, FieldErrors::single(FIELD_ID, DUPLICATE_ID)));
	}

	let book = match form.validate() {
		Ok(book) => book,
		Err(errors) => {
			debug!(?errors, "book form rejected");
			return Ok(Submit::Invalid(form, errors));
		},
	};

	// another request may have taken the id since the check above
	if !db.books().insert(&book).await? {
		debug!("duplicate book id on insert");
		return Ok(Submit::Invalid(form, FieldErrors::single(FIELD_ID, DUPLICATE_ID)));
	}

	info!("book created");
	Ok(Submit::Saved(book))
}

/// Shared by the detail page and the first step of edit and delete.
pub async fn find(db: &Db, id: &str) -> Result<Book> {
	let id = id.trim();
	if is_sentinel_id(id) {
		return Err(AppError::NotFound);
	}
	db.books().find(id).await?.ok_or(AppError::NotFound)
}

/// Second step of delete. A missing book is not an error.
#[instrument(level = "info", skip(db))]
pub async fn delete(db: &Db, id: &str) -> Result<()> {
	match db.books().remove(id.trim()).await? {
		Some(_) => info!("book deleted"),
		None => debug!("nothing to delete"),
	}
	Ok(())
}

#[instrument(level = "info", skip(db, form))]
pub async fn edit(db: &Db, id: &str, form: BookForm) -> Result<Submit> {
	// path and body ids are compared the way the form stores them
	let id = id.trim();
	if is_sentinel_id(id) || id != form.id() {
		return Err(AppError::NotFound);
	}

	let book = match form.validate() {
		Ok(book) => book,
		Err(errors) => {
			debug!(?errors, "book form rejected");
			return Ok(Submit::Invalid(form, errors));
		},
	};

	if !db.books().update(&book).await? {
		warn!("book vanished before the edit was saved");
		return Err(AppError::Conflict(book.id_book));
	}

	info!("book updated");
	Ok(Submit::Saved(book))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn form(id: &str, name: &str) -> BookForm {
		BookForm {
			id_book: id.into(),
			name_book: name.into(),
			number: "3".into(),
			year: "2020".into(),
			nha_xuat_ban: "X".into(),
			csrf_token: String::new(),
		}
	}

	async fn seeded() -> Db {
		let db = Db::open_in_memory().await.unwrap();
		match create(&db, form("B1", "Alpha")).await.unwrap() {
			Submit::Saved(_) => {},
			other => panic!("seed failed: {other:?}"),
		}
		db
	}

	#[tokio::test]
	async fn created_book_is_listed_unchanged() {
		let db = seeded().await;
		let expected = Book {
			id_book: "B1".into(),
			name_book: "Alpha".into(),
			number: 3,
			nha_xuat_ban: "X".into(),
			year: 2020,
		};
		assert_eq!(list(&db).await.unwrap(), vec![expected.clone()]);
		assert_eq!(find(&db, "B1").await.unwrap(), expected);
	}

	#[tokio::test]
	async fn duplicate_id_is_a_field_error() {
		let db = seeded().await;
		match create(&db, form(" B1", "Beta")).await.unwrap() {
			Submit::Invalid(returned, errors) => {
				assert_eq!(errors.get(FIELD_ID), Some(DUPLICATE_ID));
				assert_eq!(returned.name_book, "Beta");
			},
			other => panic!("expected duplicate error, got {other:?}"),
		}
		let books = list(&db).await.unwrap();
		assert_eq!(books.len(), 1);
		assert_eq!(books[0].name_book, "Alpha");
	}

	#[tokio::test]
	async fn invalid_form_writes_nothing() {
		let db = Db::open_in_memory().await.unwrap();
		let mut bad = form("B2", "");
		bad.year = "next year".into();
		assert!(matches!(create(&db, bad).await.unwrap(), Submit::Invalid(..)));
		assert!(list(&db).await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn lookups_reject_sentinel_and_missing_ids() {
		let db = seeded().await;
		for id in ["0", "", "B404"] {
			assert!(matches!(find(&db, id).await, Err(AppError::NotFound)), "id {id:?}");
		}
	}

	#[tokio::test]
	async fn delete_is_idempotent() {
		let db = seeded().await;
		create(&db, form("B2", "Beta")).await.unwrap();

		delete(&db, "B1").await.unwrap();
		delete(&db, "B1").await.unwrap();

		let ids: Vec<String> = list(&db).await.unwrap().into_iter().map(|b| b.id_book).collect();
		assert_eq!(ids, ["B2"]);
	}

	#[tokio::test]
	async fn edit_with_mismatched_ids_is_not_found() {
		let db = seeded().await;
		let result = edit(&db, "B1", form("B2", "Renamed")).await;
		assert!(matches!(result, Err(AppError::NotFound)));
		assert_eq!(find(&db, "B1").await.unwrap().name_book, "Alpha");
	}

	#[tokio::test]
	async fn edit_updates_fields() {
		let db = seeded().await;
		let saved = edit(&db, "B1", form("B1", "Renamed")).await.unwrap();
		assert!(matches!(saved, Submit::Saved(ref book) if book.name_book == "Renamed"));
		assert_eq!(find(&db, "B1").await.unwrap().name_book, "Renamed");
	}

	#[tokio::test]
	async fn path_id_is_trimmed_like_the_form_id() {
		let db = seeded().await;
		let saved = edit(&db, "B1 ", form(" B1", "Renamed")).await.unwrap();
		assert!(matches!(saved, Submit::Saved(ref book) if book.id_book == "B1"));
		assert_eq!(find(&db, " B1").await.unwrap().name_book, "Renamed");
		delete(&db, "B1 ").await.unwrap();
		assert!(list(&db).await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn url_unsafe_ids_are_valid_keys() {
		let db = Db::open_in_memory().await.unwrap();
		for id in ["B?1", "A/B", "C#1", "50%"] {
			assert!(matches!(create(&db, form(id, id)).await.unwrap(), Submit::Saved(_)), "id {id:?}");
		}
		assert_eq!(find(&db, "B?1").await.unwrap().name_book, "B?1");
		delete(&db, "A/B").await.unwrap();
		let ids: Vec<String> = list(&db).await.unwrap().into_iter().map(|b| b.id_book).collect();
		assert_eq!(ids, ["B?1", "C#1", "50%"]);
	}

	#[tokio::test]
	async fn edit_of_deleted_book_is_a_conflict() {
		let db = seeded().await;
		delete(&db, "B1").await.unwrap();
		let result = edit(&db, "B1", form("B1", "Renamed")).await;
		assert!(matches!(result, Err(AppError::Conflict(ref id)) if id == "B1"));
		assert!(list(&db).await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn invalid_edit_keeps_stored_values() {
		let db = seeded().await;
		let mut bad = form("B1", "Renamed");
		bad.number = "-4".into();
		assert!(matches!(edit(&db, "B1", bad).await.unwrap(), Submit::Invalid(..)));
		assert_eq!(find(&db, "B1").await.unwrap().name_book, "Alpha");
	}
}
