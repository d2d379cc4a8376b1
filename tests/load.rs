//! Loading whole workbooks through the public API

use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexMap;

use xlstable::infer::EpochMode;
use xlstable::model::{RawCell, Sheet};
use xlstable::parser::{MemoryWorkbook, WorkbookSource};
use xlstable::{
    load_workbook, CellValue, ColumnTypes, LoadError, LoadOptions, LoadResult, SemanticType,
    SheetSelector,
};

/// Records how the loader drives a workbook
struct Tracked {
    inner: MemoryWorkbook,
    releases: usize,
    decoded: Vec<String>,
}

impl Tracked {
    fn new(inner: MemoryWorkbook) -> Self {
        Self {
            inner,
            releases: 0,
            decoded: Vec::new(),
        }
    }
}

impl WorkbookSource for Tracked {
    fn sheet_names(&self) -> Vec<String> {
        self.inner.sheet_names()
    }

    fn epoch_mode(&self) -> EpochMode {
        self.inner.epoch_mode()
    }

    fn sheet_by_index(&mut self, index: usize) -> LoadResult<Sheet> {
        let sheet = self.inner.sheet_by_index(index)?;
        self.decoded.push(sheet.name().to_string());
        Ok(sheet)
    }

    fn sheet_by_name(&mut self, name: &str) -> LoadResult<Sheet> {
        let sheet = self.inner.sheet_by_name(name)?;
        self.decoded.push(sheet.name().to_string());
        Ok(sheet)
    }

    fn release(&mut self) {
        self.releases += 1;
    }
}

fn people() -> Sheet {
    Sheet::new(
        "people",
        vec![
            vec![
                RawCell::text("name"),
                RawCell::text("age"),
                RawCell::text("joined"),
                RawCell::text("active"),
            ],
            vec![
                RawCell::text("Ada"),
                RawCell::number(36.0),
                RawCell::date(43831.0),
                RawCell::boolean(true),
            ],
            vec![
                RawCell::text("Linus"),
                RawCell::number(28.0),
                RawCell::date(43832.75),
                RawCell::empty(),
            ],
        ],
    )
}

fn broken() -> Sheet {
    Sheet::new(
        "broken",
        vec![vec![RawCell::text("when")], vec![RawCell::date(-3.0)]],
    )
}

fn notes() -> Sheet {
    Sheet::new(
        "notes",
        vec![
            vec![RawCell::text("title")],
            vec![RawCell::text("hello")],
        ],
    )
}

fn workbook() -> Tracked {
    Tracked::new(MemoryWorkbook::new(vec![people(), broken(), notes()]))
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn datetime(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, min, 0).unwrap()
}

#[test]
fn test_first_sheet_is_typed_per_column() {
    let mut book = workbook();
    let table = load_workbook(&mut book, &LoadOptions::default())
        .unwrap()
        .into_single()
        .unwrap();

    assert_eq!(
        table.column_names(),
        vec![Some("name"), Some("age"), Some("joined"), Some("active")]
    );
    let types: Vec<_> = table.columns.iter().map(|c| c.semantic_type).collect();
    assert_eq!(
        types,
        vec![
            SemanticType::Text,
            SemanticType::Number,
            SemanticType::DateTime,
            SemanticType::Boolean,
        ]
    );
    assert_eq!(
        table.rows[0].cells,
        vec![
            CellValue::from("Ada"),
            CellValue::Number(36.0),
            CellValue::DateTime(datetime(2020, 1, 1, 0, 0)),
            CellValue::Bool(true),
        ]
    );
    assert_eq!(table.rows[1].cells[2], CellValue::DateTime(datetime(2020, 1, 2, 18, 0)));
    assert_eq!(table.rows[1].cells[3], CellValue::Null);
    assert_eq!(book.releases, 1);
}

#[test]
fn test_shape_invariant() {
    let mut book = workbook();
    let table = load_workbook(&mut book, &LoadOptions::default())
        .unwrap()
        .into_single()
        .unwrap();

    for (i, _) in table.columns.iter().enumerate() {
        assert_eq!(table.column_values(i).count(), table.row_count());
    }
    for row in &table.rows {
        assert_eq!(row.cells.len(), table.column_count());
    }
}

#[test]
fn test_multiple_sheets_keep_requested_order() {
    let mut book = workbook();
    let options = LoadOptions::new().with_sheets(vec![
        SheetSelector::Name("notes".into()),
        SheetSelector::Index(0),
    ]);
    let tables = load_workbook(&mut book, &options)
        .unwrap()
        .into_multiple()
        .unwrap();

    assert_eq!(tables.keys().collect::<Vec<_>>(), vec!["notes", "people"]);
    assert_eq!(tables["notes"].rows[0].cells, vec![CellValue::from("hello")]);
    assert_eq!(book.releases, 1);
}

#[test]
fn test_empty_sheet_list_yields_empty_collection() {
    let mut book = workbook();
    let options = LoadOptions::new().with_sheets(vec![]);
    let tables = load_workbook(&mut book, &options)
        .unwrap()
        .into_multiple()
        .unwrap();

    assert!(tables.is_empty());
    assert!(book.decoded.is_empty());
    assert_eq!(book.releases, 1);
}

#[test]
fn test_failing_sheet_aborts_and_releases_once() {
    let mut book = workbook();
    let options = LoadOptions::new().with_sheets(vec![
        SheetSelector::Index(0),
        SheetSelector::Name("broken".into()),
        SheetSelector::Name("notes".into()),
    ]);
    let err = load_workbook(&mut book, &options).unwrap_err();

    match err {
        LoadError::DateConversion {
            sheet, column, row, ..
        } => {
            assert_eq!(sheet, "broken");
            assert_eq!(column, 0);
            assert_eq!(row, 2);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(book.decoded, vec!["people", "broken"]);
    assert_eq!(book.releases, 1);
}

#[test]
fn test_unknown_sheet_is_not_found() {
    let mut book = workbook();
    let options = LoadOptions::new().with_sheet(SheetSelector::Name("missing".into()));
    assert!(matches!(
        load_workbook(&mut book, &options),
        Err(LoadError::SheetNotFound(ref name)) if name == "missing"
    ));
    assert_eq!(book.releases, 1);

    let options = LoadOptions::new().with_sheet(SheetSelector::Index(7));
    assert!(matches!(
        load_workbook(&mut book, &options),
        Err(LoadError::SheetIndexOutOfRange { index: 7, count: 3 })
    ));
}

#[test]
fn test_invalid_options_touch_no_sheet() {
    let mut book = workbook();
    let options = LoadOptions::new().with_row_limit(0);
    assert!(matches!(
        load_workbook(&mut book, &options),
        Err(LoadError::InvalidArgument(_))
    ));
    assert!(book.decoded.is_empty());
    assert_eq!(book.releases, 1);

    let err = LoadOptions::from_json(r#"{"skip_lines": "2"}"#).unwrap_err();
    assert!(matches!(err, LoadError::InvalidArgument(_)));
}

#[test]
fn test_overrides_win_over_detection() {
    let mut book = workbook();
    let mut types = IndexMap::new();
    types.insert("years".to_string(), SemanticType::Text);
    let options = LoadOptions::new()
        .with_column_names(vec![
            "who".into(),
            "years".into(),
            "since".into(),
            "on".into(),
        ])
        .with_column_types(ColumnTypes::Named(types));

    let table = load_workbook(&mut book, &options)
        .unwrap()
        .into_single()
        .unwrap();

    assert_eq!(
        table.column_names(),
        vec![Some("who"), Some("years"), Some("since"), Some("on")]
    );
    assert_eq!(table.columns[1].semantic_type, SemanticType::Text);
    assert_eq!(table.rows[0].cells[1], CellValue::from("36.0"));
    assert_eq!(table.columns[2].semantic_type, SemanticType::DateTime);
}

#[test]
fn test_skip_lines_and_row_limit() {
    let sheet = Sheet::new(
        "report",
        vec![
            vec![RawCell::text("Quarterly report")],
            vec![RawCell::text("day")],
            vec![RawCell::date(43831.0)],
            vec![RawCell::date(43832.0)],
            vec![RawCell::date(43833.0)],
        ],
    );
    let mut book = Tracked::new(MemoryWorkbook::new(vec![sheet]));
    let options = LoadOptions::new().with_skip_lines(1).with_row_limit(2);

    let table = load_workbook(&mut book, &options)
        .unwrap()
        .into_single()
        .unwrap();

    assert_eq!(table.column_names(), vec![Some("day")]);
    assert_eq!(table.columns[0].semantic_type, SemanticType::Date);
    assert_eq!(
        table.column_values(0).cloned().collect::<Vec<_>>(),
        vec![CellValue::Date(date(2020, 1, 1)), CellValue::Date(date(2020, 1, 2))]
    );
    assert_eq!(table.rows[0].source_line, 3);
}

#[test]
fn test_1904_workbook() {
    let sheet = Sheet::new("mac", vec![vec![RawCell::text("d")], vec![RawCell::date(0.5)]]);
    let mut book = Tracked::new(MemoryWorkbook::new(vec![sheet]).with_epoch(EpochMode::Epoch1904));
    let table = load_workbook(&mut book, &LoadOptions::default())
        .unwrap()
        .into_single()
        .unwrap();

    assert_eq!(table.columns[0].semantic_type, SemanticType::Time);
    assert_eq!(
        table.rows[0].cells[0],
        CellValue::Time(chrono::NaiveTime::from_hms_opt(12, 0, 0).unwrap())
    );
}
