use maud::{html, Markup, DOCTYPE};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::csrf;
use crate::types::{
	Book, BookForm, FieldErrors,
	FIELD_ID, FIELD_NAME, FIELD_NUMBER, FIELD_PUBLISHER, FIELD_YEAR,
};

// everything that would end or split a path segment
const SEGMENT: &AsciiSet = &CONTROLS
	.add(b' ').add(b'"').add(b'#').add(b'%').add(b'/')
	.add(b'<').add(b'>').add(b'?').add(b'`').add(b'{').add(b'}');

/// `/Book/{action}/{id}` with the id encoded as a single path segment.
pub fn book_path(action: &str, id: &str) -> String {
	format!("/Book/{action}/{}", utf8_percent_encode(id, SEGMENT))
}

pub fn layout(title: &str, content: Markup) -> Markup {
	html! {
		(DOCTYPE)
		html lang="vi" {
			head {
				meta charset="utf-8";
				title { (title) " - Thư viện" }
			}
			body {
				nav { a href="/Book" { "Danh sách sách" } }
				main { (content) }
			}
		}
	}
}

pub fn index(books: &[Book]) -> Markup {
	layout("Danh sách sách", html! {
		h1 { "Danh sách sách" }
		p {
			a href="/Book/Create" { "Thêm sách" }
			" | "
			a href="/Book/ExportBooksToExcel" { "Xuất Excel" }
		}
		table {
			thead{ tr {
				th { "Mã Sách" }
				th { "Tên Sách" }
				th { "Số Lượng" }
				th { "Nhà Xuất Bản" }
				th { "Năm Xuất Bản" }
				th {}
			} }
			tbody{
				@for book in books {
					tr{
						td { (book.id_book) }
						td { (book.name_book) }
						td { (book.number) }
						td { (book.nha_xuat_ban) }
						td { (book.year) }
						td {
							a href=(book_path("Edit", &book.id_book)) { "Sửa" }
							" | "
							a href=(book_path("Details", &book.id_book)) { "Chi tiết" }
							" | "
							a href=(book_path("Delete", &book.id_book)) { "Xoá" }
						}
					}
				}
			}
		}
	})
}

fn field(label: &str, name: &str, kind: &str, value: &str, readonly: bool, errors: &FieldErrors) -> Markup {
	html! {
		div {
			label for=(name) { (label) }
			input id=(name) name=(name) type=(kind) value=(value) readonly[readonly];
			@if let Some(message) = errors.get(name) {
				span class="field-error" { (message) }
			}
		}
	}
}

/// Create and edit share one form; on edit the id is fixed.
pub fn book_form(
	title: &str,
	action: &str,
	form: &BookForm,
	errors: &FieldErrors,
	token: &str,
	editing: bool,
) -> Markup {
	layout(title, html! {
		h1 { (title) }
		form method="POST" action=(action) {
			input type="hidden" name=(csrf::FIELD_NAME) value=(token);
			(field("Mã Sách", FIELD_ID, "text", &form.id_book, editing, errors))
			(field("Tên Sách", FIELD_NAME, "text", &form.name_book, false, errors))
			(field("Số Lượng", FIELD_NUMBER, "number", &form.number, false, errors))
			(field("Năm Xuất Bản", FIELD_YEAR, "number", &form.year, false, errors))
			(field("Nhà Xuất Bản", FIELD_PUBLISHER, "text", &form.nha_xuat_ban, false, errors))
			button { "Lưu" }
		}
		a href="/Book" { "Quay lại danh sách" }
	})
}

fn book_summary(book: &Book) -> Markup {
	html! {
		dl {
			dt { "Mã Sách" } dd { (book.id_book) }
			dt { "Tên Sách" } dd { (book.name_book) }
			dt { "Số Lượng" } dd { (book.number) }
			dt { "Nhà Xuất Bản" } dd { (book.nha_xuat_ban) }
			dt { "Năm Xuất Bản" } dd { (book.year) }
		}
	}
}

pub fn details(book: &Book) -> Markup {
	layout(&book.name_book, html! {
		h1 { "Chi tiết sách" }
		(book_summary(book))
		a href=(book_path("Edit", &book.id_book)) { "Sửa" }
		" | "
		a href="/Book" { "Quay lại danh sách" }
	})
}

pub fn delete_confirm(book: &Book, token: &str) -> Markup {
	layout("Xoá sách", html! {
		h1 { "Bạn có chắc muốn xoá sách này?" }
		(book_summary(book))
		form method="POST" action=(book_path("Delete", &book.id_book)) {
			input type="hidden" name=(csrf::FIELD_NAME) value=(token);
			button { "Xoá" }
		}
		a href="/Book" { "Quay lại danh sách" }
	})
}
