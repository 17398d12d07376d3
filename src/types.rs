use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::Deserialize;

pub type BookId = String;

pub const FIELD_ID: &str = "IdBook";
pub const FIELD_NAME: &str = "NameBook";
pub const FIELD_NUMBER: &str = "Number";
pub const FIELD_PUBLISHER: &str = "NhaXuatBan";
pub const FIELD_YEAR: &str = "Year";

pub const DUPLICATE_ID: &str = "Mã sách đã tồn tại, vui lòng chọn mã sách khác";

/// A row of the `Book` table.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
#[sqlx(rename_all = "PascalCase")]
pub struct Book {
	pub id_book: BookId,
	pub name_book: String,
	pub number: i32,
	pub nha_xuat_ban: String,
	pub year: i32,
}

/// `""` and `"0"` never name a stored book.
pub fn is_sentinel_id(id: &str) -> bool {
	let id = id.trim();
	id.is_empty() || id == "0"
}

/// Fields accepted by the create and edit forms. Anything else in the body is
/// rejected while deserializing. Numbers stay as text so a bad value can be
/// shown back to the user unchanged.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields, default)]
pub struct BookForm {
	pub id_book: String,
	pub name_book: String,
	pub number: String,
	pub year: String,
	pub nha_xuat_ban: String,
	pub csrf_token: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields, default)]
pub struct DeleteForm {
	pub csrf_token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
	pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
		self.0.entry(field).or_insert_with(|| message.into());
	}

	pub fn get(&self, field: &str) -> Option<&str> {
		self.0.get(field).map(String::as_str)
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn single(field: &'static str, message: impl Into<String>) -> Self {
		let mut errors = FieldErrors::default();
		errors.add(field, message);
		errors
	}
}

impl BookForm {
	pub fn id(&self) -> &str {
		self.id_book.trim()
	}

	/// Checks every field and builds the book, or reports each offending
	/// field once.
	pub fn validate(&self) -> Result<Book, FieldErrors> {
		let mut errors = FieldErrors::default();

		let id = self.id();
		if id.is_empty() {
			errors.add(FIELD_ID, "Mã sách là bắt buộc");
		} else if is_sentinel_id(id) {
			errors.add(FIELD_ID, "Mã sách không hợp lệ");
		}

		let name = self.name_book.trim();
		if name.is_empty() {
			errors.add(FIELD_NAME, "Tên sách là bắt buộc");
		}

		let publisher = self.nha_xuat_ban.trim();
		if publisher.is_empty() {
			errors.add(FIELD_PUBLISHER, "Nhà xuất bản là bắt buộc");
		}

		let number = match self.number.trim().parse::<i32>() {
			Ok(n) if n >= 0 => n,
			_ => {
				errors.add(FIELD_NUMBER, "Số lượng phải là số nguyên không âm");
				0
			},
		};

		let year = match self.year.trim().parse::<i32>() {
			Ok(y) if (1..=9999).contains(&y) => y,
			_ => {
				errors.add(FIELD_YEAR, "Năm xuất bản không hợp lệ");
				0
			},
		};

		if !errors.is_empty() {
			return Err(errors);
		}
		Ok(Book {
			id_book: id.to_string(),
			name_book: name.to_string(),
			number,
			nha_xuat_ban: publisher.to_string(),
			year,
		})
	}
}

impl From<&Book> for BookForm {
	fn from(book: &Book) -> Self {
		BookForm {
			id_book: book.id_book.clone(),
			name_book: book.name_book.clone(),
			number: book.number.to_string(),
			year: book.year.to_string(),
			nha_xuat_ban: book.nha_xuat_ban.clone(),
			csrf_token: String::new(),
		}
	}
}

/// A row of the `SinhVien` (student borrower) table.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Student {
	#[sqlx(rename = "Id")]
	pub id: i64,
	#[sqlx(rename = "IdSV")]
	pub id_sv: String,
	#[sqlx(rename = "IdBook")]
	pub id_book: Option<BookId>,
	#[sqlx(rename = "NameSV")]
	pub name_sv: String,
	#[sqlx(rename = "Khoa")]
	pub khoa: String,
	#[sqlx(rename = "PhoneSV")]
	pub phone_sv: String,
	#[sqlx(rename = "ClassName")]
	pub class_name: String,
	#[sqlx(rename = "BorrowDate")]
	pub borrow_date: NaiveDateTime,
	#[sqlx(rename = "PayDate")]
	pub pay_date: String,
	// meaning of the values is up to the borrowing workflow
	#[sqlx(rename = "Status")]
	pub status: i32,
}

#[derive(Debug, Clone)]
pub struct NewStudent {
	pub id_sv: String,
	pub id_book: Option<BookId>,
	pub name_sv: String,
	pub khoa: String,
	pub phone_sv: String,
	pub class_name: String,
	pub borrow_date: NaiveDateTime,
	pub pay_date: String,
	pub status: i32,
}
