use rust_xlsxwriter::{Format, Workbook};

use crate::error::Result;
use crate::types::Book;

pub const FILE_NAME: &str = "Books.xlsx";
pub const MIME_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const SHEET_NAME: &str = "Books";

pub const HEADERS: [&str; 5] = [
	"Mã Sách",
	"Tên Sách",
	"Số Lượng",
	"Nhà Xuất Bản",
	"Năm Xuất Bản",
];

/// Builds a single-sheet workbook with one row per book, in the order given,
/// and returns the serialized file.
pub fn books_to_xlsx(books: &[Book]) -> Result<Vec<u8>> {
	let mut workbook = Workbook::new();
	let header_format = Format::new().set_bold();

	let worksheet = workbook.add_worksheet();
	worksheet.set_name(SHEET_NAME)?;

	for (col, header) in HEADERS.iter().enumerate() {
		worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
	}

	for (idx, book) in books.iter().enumerate() {
		let row = (idx + 1) as u32;
		worksheet.write_string(row, 0, &book.id_book)?;
		worksheet.write_string(row, 1, &book.name_book)?;
		worksheet.write_number(row, 2, f64::from(book.number))?;
		worksheet.write_string(row, 3, &book.nha_xuat_ban)?;
		worksheet.write_number(row, 4, f64::from(book.year))?;
	}

	worksheet.autofit();

	Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
	use super::*;
	use calamine::{open_workbook_from_rs, DataType, Reader, Xlsx};
	use std::io::Cursor;

	fn read_back(bytes: Vec<u8>) -> Vec<Vec<DataType>> {
		let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).expect("xlsx parsed");
		let range = workbook
			.worksheet_range(SHEET_NAME)
			.expect("Books sheet present")
			.expect("Books sheet readable");
		range.rows().map(|row| row.to_vec()).collect()
	}

	#[test]
	fn single_book_lands_under_fixed_header() {
		let bytes = books_to_xlsx(&[Book {
			id_book: "B1".into(),
			name_book: "Alpha".into(),
			number: 3,
			nha_xuat_ban: "X".into(),
			year: 2020,
		}]).unwrap();

		let rows = read_back(bytes);
		assert_eq!(rows.len(), 2);
		let header: Vec<DataType> = HEADERS.iter().map(|h| DataType::String(h.to_string())).collect();
		assert_eq!(rows[0], header);
		assert_eq!(rows[1], vec![
			DataType::String("B1".into()),
			DataType::String("Alpha".into()),
			DataType::Float(3.0),
			DataType::String("X".into()),
			DataType::Float(2020.0),
		]);
	}

	#[test]
	fn rows_follow_listing_order() {
		let books: Vec<Book> = ["Z", "A", "M"].iter().map(|id| Book {
			id_book: id.to_string(),
			name_book: format!("book {id}"),
			number: 0,
			nha_xuat_ban: "P".into(),
			year: 1999,
		}).collect();

		let rows = read_back(books_to_xlsx(&books).unwrap());
		let ids: Vec<&DataType> = rows.iter().skip(1).map(|row| &row[0]).collect();
		assert_eq!(ids, [
			&DataType::String("Z".into()),
			&DataType::String("A".into()),
			&DataType::String("M".into()),
		]);
	}

	#[test]
	fn empty_collection_still_has_header() {
		let rows = read_back(books_to_xlsx(&[]).unwrap());
		assert_eq!(rows.len(), 1);
		assert_eq!(rows[0][4], DataType::String("Năm Xuất Bản".into()));
	}
}
