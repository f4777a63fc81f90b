use std::io::Read;
use std::path::Path;

use crate::config::{ColumnsConfig, TableConfig};
use crate::core::course::{split_requirements, CourseCode, CourseRecord};
use crate::error::{CurriculumError, Result};

/// Reads the course table at `path`. Any malformed required field aborts the
/// whole load.
pub fn load_table(path: &Path, config: &TableConfig) -> Result<Vec<CourseRecord>> {
    let delimiter = config.delimiter_byte()?;
    let mut reader = reader_builder(delimiter)
        .from_path(path)
        .map_err(|source| CurriculumError::Table {
            path: path.to_path_buf(),
            source,
        })?;
    let records = read_records(&mut reader, &config.columns, path)?;
    tracing::info!(path = %path.display(), courses = records.len(), "loaded course table");
    Ok(records)
}

/// Parses an in-memory course table.
pub fn parse_table(input: &str, config: &TableConfig) -> Result<Vec<CourseRecord>> {
    let delimiter = config.delimiter_byte()?;
    let mut reader = reader_builder(delimiter).from_reader(input.as_bytes());
    read_records(&mut reader, &config.columns, Path::new("<inline>"))
}

fn reader_builder(delimiter: u8) -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All);
    builder
}

fn read_records<R: Read>(
    reader: &mut csv::Reader<R>,
    columns: &ColumnsConfig,
    path: &Path,
) -> Result<Vec<CourseRecord>> {
    let table_error = |source| CurriculumError::Table {
        path: path.to_path_buf(),
        source,
    };
    let headers = reader.headers().map_err(table_error)?.clone();
    let layout = ColumnLayout::new(&headers, columns);

    let mut records = Vec::new();
    for (idx, row) in reader.records().enumerate() {
        let row = row.map_err(table_error)?;
        records.push(layout.parse_row(idx + 1, &row)?);
    }
    Ok(records)
}

struct ColumnLayout<'a> {
    columns: &'a ColumnsConfig,
    code: Option<usize>,
    title: Option<usize>,
    semester: Option<usize>,
    prerequisites: Option<usize>,
    corequisites: Option<usize>,
}

impl<'a> ColumnLayout<'a> {
    fn new(headers: &csv::StringRecord, columns: &'a ColumnsConfig) -> Self {
        let position = |name: &str| headers.iter().position(|header| header == name);
        Self {
            columns,
            code: position(&columns.code),
            title: position(&columns.title),
            semester: position(&columns.semester),
            prerequisites: position(&columns.prerequisites),
            corequisites: position(&columns.corequisites),
        }
    }

    fn parse_row(&self, row_number: usize, row: &csv::StringRecord) -> Result<CourseRecord> {
        let get_field = |idx: Option<usize>| {
            idx.and_then(|idx| row.get(idx))
                .map(str::trim)
                .filter(|value| !value.is_empty())
        };

        let code = get_field(self.code).ok_or_else(|| CurriculumError::MissingField {
            row: row_number,
            field: self.columns.code.clone(),
            detail: "value is empty or column is absent".to_string(),
        })?;

        let semester_raw = get_field(self.semester).ok_or_else(|| CurriculumError::MissingField {
            row: row_number,
            field: self.columns.semester.clone(),
            detail: "value is empty or column is absent".to_string(),
        })?;
        let semester = parse_semester(semester_raw).ok_or_else(|| CurriculumError::MissingField {
            row: row_number,
            field: self.columns.semester.clone(),
            detail: format!("'{semester_raw}' is not a positive integer"),
        })?;

        Ok(CourseRecord {
            code: CourseCode::new(code),
            title: get_field(self.title).unwrap_or_default().to_string(),
            semester,
            prerequisites: split_requirements(get_field(self.prerequisites)),
            corequisites: split_requirements(get_field(self.corequisites)),
        })
    }
}

/// Accepts integers and integral decimals such as `2.0`, which spreadsheet
/// exports write for numeric columns.
fn parse_semester(raw: &str) -> Option<u32> {
    let semester = match raw.parse::<u32>() {
        Ok(semester) => semester,
        Err(_) => {
            let value = raw.parse::<f64>().ok()?;
            if value.fract() != 0.0 || value < 1.0 || value > f64::from(u32::MAX) {
                return None;
            }
            value as u32
        }
    };
    (semester > 0).then_some(semester)
}

#[cfg(test)]
mod tests {
    use super::*;

    const AERO_TABLE: &str = "\
Course Code,Course Title,Semester,Prerequisites,Corequisites
AERO101,Intro,1,,
AERO201,Aerodynamics,2,AERO101,
AERO301,Flight Mech,3,\"AERO201, MATH201\",AERO999
";

    #[test]
    fn parses_rows_in_table_order() {
        let records = parse_table(AERO_TABLE, &TableConfig::default()).expect("parse table");
        let codes: Vec<_> = records.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["AERO101", "AERO201", "AERO301"]);

        let flight = &records[2];
        assert_eq!(flight.title, "Flight Mech");
        assert_eq!(flight.semester, 3);
        assert_eq!(flight.prerequisites, vec!["AERO201", "MATH201"]);
        assert_eq!(flight.corequisites, vec!["AERO999"]);
        assert!(records[0].prerequisites.is_empty());
    }

    #[test]
    fn requirement_columns_may_be_absent() {
        let input = "Course Code,Course Title,Semester\nAERO101,Intro,1\n";
        let records = parse_table(input, &TableConfig::default()).expect("parse table");
        assert_eq!(records.len(), 1);
        assert!(records[0].prerequisites.is_empty());
        assert!(records[0].corequisites.is_empty());
    }

    #[test]
    fn short_rows_are_tolerated() {
        let input = "\
Course Code,Course Title,Semester,Prerequisites,Corequisites
AERO101,Intro,1
";
        let records = parse_table(input, &TableConfig::default()).expect("parse table");
        assert_eq!(records[0].code.as_str(), "AERO101");
    }

    #[test]
    fn non_integer_semester_is_a_missing_field() {
        let input = "Course Code,Course Title,Semester\nAERO101,Intro,1\nAERO201,Aero,two\n";
        let err = parse_table(input, &TableConfig::default()).unwrap_err();
        match err {
            CurriculumError::MissingField { row, field, .. } => {
                assert_eq!(row, 2);
                assert_eq!(field, "Semester");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn integral_decimal_semester_is_accepted() {
        let input = "Course Code,Course Title,Semester\nAERO101,Intro,1.0\nAERO201,Aero,2\n";
        let records = parse_table(input, &TableConfig::default()).expect("parse table");
        assert_eq!(records[0].semester, 1);
        assert_eq!(records[1].semester, 2);

        for raw in ["2.5", "0.0", "-1", "NaN", "inf"] {
            assert_eq!(parse_semester(raw), None, "{raw} accepted");
        }
    }

    #[test]
    fn zero_semester_is_rejected() {
        let input = "Course Code,Course Title,Semester\nAERO101,Intro,0\n";
        assert!(matches!(
            parse_table(input, &TableConfig::default()),
            Err(CurriculumError::MissingField { row: 1, .. })
        ));
    }

    #[test]
    fn blank_code_is_a_missing_field() {
        let input = "Course Code,Course Title,Semester\n  ,Intro,1\n";
        match parse_table(input, &TableConfig::default()).unwrap_err() {
            CurriculumError::MissingField { field, .. } => assert_eq!(field, "Course Code"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn configured_columns_and_delimiter_are_honoured() {
        let mut config = TableConfig {
            delimiter: ";".to_string(),
            ..TableConfig::default()
        };
        config.columns.code = "Code".to_string();
        config.columns.prerequisites = "Requires".to_string();
        let input = "Code;Course Title;Semester;Requires\nA;Alpha;1;\nB;Beta;2;A\n";

        let records = parse_table(input, &config).expect("parse table");
        assert_eq!(records[1].code.as_str(), "B");
        assert_eq!(records[1].prerequisites, vec!["A"]);
    }
}
