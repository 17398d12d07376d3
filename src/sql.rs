use std::str::FromStr;

use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::config::Config;
use crate::error::Result;
use crate::types::{Book, NewStudent, Student};

pub static MIGRATOR: Migrator = sqlx::migrate!();

const BOOK_COLUMNS: &str = "IdBook, NameBook, Number, NhaXuatBan, Year";

/// Storage handle shared by every request. Each mutation through the typed
/// collections is its own transaction.
#[derive(Debug, Clone)]
pub struct Db {
	pool: SqlitePool,
}

impl Db {
	pub async fn connect(config: &Config) -> Result<Db> {
		let options = SqliteConnectOptions::from_str(&config.database_url)?
			.create_if_missing(true);

		let pool = SqlitePoolOptions::new()
			.max_connections(config.max_connections)
			.acquire_timeout(config.acquire_timeout)
			.connect_with(options).await?;

		Ok(Db::from_pool(pool))
	}

	/// Migrated single-connection database that lives as long as the handle.
	pub async fn open_in_memory() -> Result<Db> {
		let pool = SqlitePoolOptions::new()
			.max_connections(1)
			.idle_timeout(None)
			.max_lifetime(None)
			.connect("sqlite::memory:").await?;

		let db = Db::from_pool(pool);
		db.migrate().await?;
		Ok(db)
	}

	pub fn from_pool(pool: SqlitePool) -> Db {
		Db { pool }
	}

	pub async fn migrate(&self) -> Result<()> {
		MIGRATOR.run(&self.pool).await?;
		Ok(())
	}

	pub fn books(&self) -> Books<'_> {
		Books { pool: &self.pool }
	}

	pub fn students(&self) -> Students<'_> {
		Students { pool: &self.pool }
	}
}

pub struct Books<'a> {
	pool: &'a SqlitePool,
}

impl Books<'_> {
	// rowid keeps insertion order even though the key is text
	pub async fn all(&self) -> Result<Vec<Book>> {
		let books = sqlx::query_as::<_, Book>(
			&format!("SELECT {BOOK_COLUMNS} FROM Book ORDER BY rowid;")
		).fetch_all(self.pool).await?;
		Ok(books)
	}

	pub async fn find(&self, id: &str) -> Result<Option<Book>> {
		let book = sqlx::query_as::<_, Book>(
			&format!("SELECT {BOOK_COLUMNS} FROM Book WHERE IdBook = ?;")
		)
			.bind(id)
			.fetch_optional(self.pool).await?;
		Ok(book)
	}

	pub async fn exists(&self, id: &str) -> Result<bool> {
		let count = sqlx::query_scalar::<_, i64>(
			"SELECT COUNT(*) FROM Book WHERE IdBook = ?;"
		)
			.bind(id)
			.fetch_one(self.pool).await?;
		Ok(count > 0)
	}

	/// Returns `false` instead of an error when the key is already taken.
	pub async fn insert(&self, book: &Book) -> Result<bool> {
		let mut tx = self.pool.begin().await?;
		let inserted = sqlx::query(
			"INSERT INTO Book (IdBook, NameBook, Number, NhaXuatBan, Year) VALUES (?, ?, ?, ?, ?);"
		)
			.bind(&book.id_book)
			.bind(&book.name_book)
			.bind(book.number)
			.bind(&book.nha_xuat_ban)
			.bind(book.year)
			.execute(&mut *tx).await;

		match inserted {
			Ok(_) => {},
			Err(sqlx::Error::Database(err)) if err.is_unique_violation() => return Ok(false),
			Err(err) => return Err(err.into()),
		}
		tx.commit().await?;
		Ok(true)
	}

	/// Returns `false` when no row carries the book's id.
	pub async fn update(&self, book: &Book) -> Result<bool> {
		let mut tx = self.pool.begin().await?;
		let updated = sqlx::query(
			"UPDATE Book SET NameBook = ?, Number = ?, NhaXuatBan = ?, Year = ? WHERE IdBook = ?;"
		)
			.bind(&book.name_book)
			.bind(book.number)
			.bind(&book.nha_xuat_ban)
			.bind(book.year)
			.bind(&book.id_book)
			.execute(&mut *tx).await?
			.rows_affected();
		tx.commit().await?;
		Ok(updated > 0)
	}

	/// Removes the book if present; the transaction commits either way.
	pub async fn remove(&self, id: &str) -> Result<Option<Book>> {
		let mut tx = self.pool.begin().await?;
		let found = sqlx::query_as::<_, Book>(
			&format!("SELECT {BOOK_COLUMNS} FROM Book WHERE IdBook = ?;")
		)
			.bind(id)
			.fetch_optional(&mut *tx).await?;

		if found.is_some() {
			sqlx::query("DELETE FROM Book WHERE IdBook = ?;")
				.bind(id)
				.execute(&mut *tx).await?;
		}
		tx.commit().await?;
		Ok(found)
	}
}

pub struct Students<'a> {
	pool: &'a SqlitePool,
}

impl Students<'_> {
	pub async fn all(&self) -> Result<Vec<Student>> {
		let students = sqlx::query_as::<_, Student>(
			"SELECT Id, IdSV, IdBook, NameSV, Khoa, PhoneSV, ClassName, BorrowDate, PayDate, Status FROM SinhVien ORDER BY Id;"
		).fetch_all(self.pool).await?;
		Ok(students)
	}

	pub async fn find(&self, id: i64) -> Result<Option<Student>> {
		let student = sqlx::query_as::<_, Student>(
			"SELECT Id, IdSV, IdBook, NameSV, Khoa, PhoneSV, ClassName, BorrowDate, PayDate, Status FROM SinhVien WHERE Id = ?;"
		)
			.bind(id)
			.fetch_optional(self.pool).await?;
		Ok(student)
	}

	// on Ok returns the new Id
	pub async fn insert(&self, student: &NewStudent) -> Result<i64> {
		let mut tx = self.pool.begin().await?;
		let id = sqlx::query(r#"
INSERT INTO SinhVien
	(IdSV, IdBook, NameSV, Khoa, PhoneSV, ClassName, BorrowDate, PayDate, Status)
VALUES
	(?, ?, ?, ?, ?, ?, ?, ?, ?);
		"#)
			.bind(&student.id_sv)
			.bind(&student.id_book)
			.bind(&student.name_sv)
			.bind(&student.khoa)
			.bind(&student.phone_sv)
			.bind(&student.class_name)
			.bind(student.borrow_date)
			.bind(&student.pay_date)
			.bind(student.status)
			.execute(&mut *tx).await?
			.last_insert_rowid();
		tx.commit().await?;
		Ok(id)
	}
}
