use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use calamine::{Data, Reader, open_workbook_auto_from_rs};
use std::error::Error;
use std::io::Cursor;

use crate::table::{Table, Value};

/// Extract the raw bytes from an uploaded data URL
///
/// Browser uploads arrive as `data:<mime>;base64,<payload>` strings. The
/// declared content type before the comma is ignored; only the payload is
/// decoded. Anything that is not a data URL, or whose payload is not valid
/// base64, is an error.
pub fn decode_data_url(contents: &str) -> Result<Vec<u8>, Box<dyn Error>> {
    let (_content_type, payload) = contents
        .split_once(',')
        .ok_or("upload content is not a data URL")?;

    Ok(BASE64.decode(payload)?)
}

/// Detect file type and parse the appropriate format
///
/// Dispatch is on the literal lowercase substring `csv` or `xls` anywhere in
/// the filename, not on a true extension match. This mirrors the documented
/// upload contract; filenames matching neither substring are rejected with an
/// explicit error.
///
/// # Arguments
/// * `payload` - Raw file content
/// * `filename` - The name the file was uploaded under
///
/// # Returns
/// * `Result<Table, Box<dyn Error>>` - The parsed table or an error
pub fn parse_upload(payload: &[u8], filename: &str) -> Result<Table, Box<dyn Error>> {
    if filename.contains("csv") {
        from_csv(payload)
    } else if filename.contains("xls") {
        from_excel(payload)
    } else {
        Err(format!("unsupported file type: {}", filename).into())
    }
}

/// Parse CSV bytes into a table
///
/// The payload must be valid UTF-8. The first record is the header; every
/// following record becomes a row of inferred scalar values. Records with a
/// field count different from the header are a parse error.
pub fn from_csv(payload: &[u8]) -> Result<Table, Box<dyn Error>> {
    let text = std::str::from_utf8(payload)?;
    if text.trim().is_empty() {
        return Err("CSV file is empty".into());
    }

    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let columns: Vec<String> = reader.headers()?.iter().map(String::from).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(Value::from_field).collect());
    }

    Ok(Table::new(columns, rows))
}

/// Parse Excel workbook bytes into a table
///
/// Uses the first worksheet, with its first row as the header. Cell values
/// keep their spreadsheet types where possible; anything else (dates, cell
/// errors) is carried as display text.
pub fn from_excel(payload: &[u8]) -> Result<Table, Box<dyn Error>> {
    let cursor = Cursor::new(payload);
    let mut workbook = open_workbook_auto_from_rs(cursor)?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or("no sheets found in Excel file")??;

    let mut cell_rows = range.rows();
    let header = cell_rows.next().ok_or("Excel sheet is empty")?;

    let columns: Vec<String> = header.iter().map(header_label).collect();
    let rows: Vec<Vec<Value>> = cell_rows
        .map(|row| row.iter().map(cell_value).collect())
        .collect();

    Ok(Table::new(columns, rows))
}

fn header_label(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Int(i) => Value::Int(*i),
        Data::Float(f) => Value::Float(*f),
        Data::Bool(b) => Value::Bool(*b),
        Data::String(s) => Value::Text(s.clone()),
        Data::Empty => Value::Empty,
        other => Value::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::{Workbook, Worksheet};

    #[test]
    fn csv_parse_basic() {
        let table = from_csv(b"name,age\nAlice,30\nBob,25\n").unwrap();

        assert_eq!(table.columns, vec!["name".to_string(), "age".to_string()]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(
            table.rows[0],
            vec![Value::Text("Alice".to_string()), Value::Int(30)]
        );
    }

    #[test]
    fn csv_header_only_gives_zero_rows() {
        let table = from_csv(b"name,age\n").unwrap();
        assert_eq!(table.columns.len(), 2);
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn csv_rejects_empty_input() {
        assert!(from_csv(b"").is_err());
        assert!(from_csv(b"  \n ").is_err());
    }

    #[test]
    fn csv_rejects_invalid_utf8() {
        assert!(from_csv(&[0xff, 0xfe, 0x00]).is_err());
    }

    #[test]
    fn csv_rejects_ragged_rows() {
        assert!(from_csv(b"a,b\n1,2,3\n").is_err());
    }

    #[test]
    fn dispatch_matches_substring_not_extension() {
        // "csv" anywhere in the name selects the CSV branch
        assert!(parse_upload(b"a,b\n1,2\n", "my_csv_backup.dat").is_ok());
    }

    #[test]
    fn dispatch_rejects_unknown_filenames() {
        let err = parse_upload(b"whatever", "notes.txt").unwrap_err();
        assert!(err.to_string().contains("unsupported file type"));
    }

    #[test]
    fn data_url_decodes_payload() {
        // "a,b\n1,2\n"
        let url = "data:text/csv;base64,YSxiCjEsMgo=";
        assert_eq!(decode_data_url(url).unwrap(), b"a,b\n1,2\n".to_vec());
    }

    #[test]
    fn data_url_without_comma_is_an_error() {
        assert!(decode_data_url("not a data url").is_err());
    }

    #[test]
    fn data_url_with_bad_base64_is_an_error() {
        assert!(decode_data_url("data:text/csv;base64,!!!!").is_err());
    }

    fn excel_fixture() -> Vec<u8> {
        let mut workbook = Workbook::new();
        let mut worksheet = Worksheet::new();

        worksheet.write_string(0, 0, "name").unwrap();
        worksheet.write_string(0, 1, "age").unwrap();
        worksheet.write_string(1, 0, "Alice").unwrap();
        worksheet.write_number(1, 1, 30.0).unwrap();

        workbook.push_worksheet(worksheet);
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn excel_parse_first_sheet() {
        let payload = excel_fixture();
        let table = parse_upload(&payload, "people.xlsx").unwrap();

        assert_eq!(table.columns, vec!["name".to_string(), "age".to_string()]);
        assert_eq!(
            table.rows,
            vec![vec![Value::Text("Alice".to_string()), Value::Float(30.0)]]
        );
    }

    #[test]
    fn excel_rejects_garbage_bytes() {
        assert!(from_excel(b"this is not a workbook").is_err());
    }
}
