use crate::domain::model::Record;
use crate::utils::error::ParseError;
use scraper::{ElementRef, Html};

const MIN_CELLS: usize = 3;
const NAME_CELL: usize = 1;
const METRIC_CELL: usize = 2;
/// The first anchor in the name cell is usually a flag icon link.
const TITLE_ANCHOR: usize = 1;

/// Counts of rows that were skipped or needed a fallback while parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseReport {
    pub rows_seen: usize,
    pub header_rows: usize,
    pub short_rows: usize,
    pub name_fallbacks: usize,
    pub metric_defaults: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTable {
    pub records: Vec<Record>,
    pub report: ParseReport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NameSource {
    AnchorTitle,
    VisibleText,
}

/// Extracts ranked records from the first `<tbody>` of an HTML document.
///
/// Only the name and the USD figure are read from the markup. Any further
/// schema fields are carried for forward compatibility and stay empty.
#[derive(Debug, Clone)]
pub struct TableParser {
    schema: Vec<String>,
}

impl TableParser {
    pub fn new(schema: Vec<String>) -> Result<Self, ParseError> {
        if schema.is_empty() {
            return Err(ParseError::EmptySchema);
        }
        Ok(Self { schema })
    }

    pub fn schema(&self) -> &[String] {
        &self.schema
    }

    pub fn parse(&self, document: &str) -> Result<Vec<Record>, ParseError> {
        self.parse_with_report(document).map(|table| table.records)
    }

    pub fn parse_with_report(&self, document: &str) -> Result<ParsedTable, ParseError> {
        let html = Html::parse_document(document);

        let tbody = elements_named(html.root_element(), "tbody")
            .next()
            .ok_or(ParseError::NoTableBody)?;

        let rows: Vec<ElementRef<'_>> = elements_named(tbody, "tr").collect();
        if rows.is_empty() {
            return Err(ParseError::NoRows);
        }

        let mut report = ParseReport::default();
        let mut records = Vec::with_capacity(rows.len());

        for row in rows {
            report.rows_seen += 1;

            let cells: Vec<ElementRef<'_>> = elements_named(row, "td").collect();
            if cells.is_empty() {
                report.header_rows += 1;
                continue;
            }
            if cells.len() < MIN_CELLS {
                report.short_rows += 1;
                continue;
            }

            let (name, source) = extract_name(cells[NAME_CELL]);
            if source == NameSource::VisibleText {
                report.name_fallbacks += 1;
            }

            let mc_usd_billion = match extract_metric(cells[METRIC_CELL]) {
                Some(value) => value,
                None => {
                    report.metric_defaults += 1;
                    0.0
                }
            };

            records.push(Record::new(name, mc_usd_billion));
        }

        Ok(ParsedTable { records, report })
    }
}

/// Element descendants of `root` (excluding `root`) with the given tag name, in document order.
fn elements_named<'a>(
    root: ElementRef<'a>,
    tag: &'static str,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    root.descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .filter(move |el| el.value().name() == tag)
}

fn extract_name(cell: ElementRef<'_>) -> (String, NameSource) {
    match anchor_title(cell) {
        Some(title) => (title.to_string(), NameSource::AnchorTitle),
        None => (visible_text(cell), NameSource::VisibleText),
    }
}

/// `title` of the second anchor in the cell. `None` when there are fewer
/// than two anchors or the anchor carries no title.
fn anchor_title<'a>(cell: ElementRef<'a>) -> Option<&'a str> {
    elements_named(cell, "a")
        .nth(TITLE_ANCHOR)?
        .value()
        .attr("title")
}

/// Every text node of the cell, trimmed, joined without a separator.
fn visible_text(cell: ElementRef<'_>) -> String {
    cell.text()
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect()
}

fn extract_metric(cell: ElementRef<'_>) -> Option<f64> {
    let first = cell.first_child()?;
    let text = first.value().as_text()?;
    parse_figure(text)
}

/// Drops exactly one trailing character (the footnote marker) and parses the rest.
fn parse_figure(raw: &str) -> Option<f64> {
    let mut chars = raw.chars();
    chars.next_back()?;
    let value: f64 = chars.as_str().trim().parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> TableParser {
        TableParser::new(vec!["Name".to_string(), "MC_USD_Billion".to_string()]).unwrap()
    }

    fn table(rows: &str) -> String {
        format!(
            "<html><body><table><tbody>{}</tbody></table></body></html>",
            rows
        )
    }

    #[test]
    fn test_parse_prefers_anchor_title_and_defaults_bad_metric() {
        let html = table(
            "<tr><th>Rank</th><th>Bank name</th><th>Market cap</th></tr>\
             <tr><td>1</td><td><a><a title='Global Bank'>GB</a></a></td><td>100.5†</td></tr>\
             <tr><td>2</td><td><span>Local Bank</span></td><td>bad</td></tr>",
        );

        let parsed = parser().parse_with_report(&html).unwrap();

        assert_eq!(
            parsed.records,
            vec![Record::new("Global Bank", 100.5), Record::new("Local Bank", 0.0)]
        );
        assert_eq!(parsed.report.rows_seen, 3);
        assert_eq!(parsed.report.header_rows, 1);
        assert_eq!(parsed.report.name_fallbacks, 1);
        assert_eq!(parsed.report.metric_defaults, 1);
    }

    #[test]
    fn test_wikipedia_style_row() {
        let html = table(
            "<tr><td>1\n</td>\
             <td><span class=\"flagicon\"><a href=\"/wiki/United_States\" title=\"United States\"><img></a></span> \
             <a href=\"/wiki/JPMorgan_Chase\" title=\"JPMorgan Chase\">JPMorgan Chase</a>\n</td>\
             <td>432.92\n</td></tr>",
        );

        let records = parser().parse(&html).unwrap();

        assert_eq!(records, vec![Record::new("JPMorgan Chase", 432.92)]);
    }

    #[test]
    fn test_short_rows_are_dropped() {
        let html = table(
            "<tr><td>1</td><td>Alpha</td><td>10.0x</td></tr>\
             <tr><td>only one</td></tr>\
             <tr><td>2</td><td>Beta</td></tr>\
             <tr><td>3</td><td>Gamma</td><td>30.0x</td><td>extra</td></tr>",
        );

        let parsed = parser().parse_with_report(&html).unwrap();

        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.records[0].name, "Alpha");
        assert_eq!(parsed.records[1].name, "Gamma");
        assert_eq!(parsed.records[1].mc_usd_billion, 30.0);
        assert_eq!(parsed.report.short_rows, 2);
    }

    #[test]
    fn test_name_falls_back_when_title_missing() {
        let html = table(
            "<tr><td>1</td><td><a href='#'>x</a> <a href='/b'>Bank B</a></td><td>5.0*</td></tr>\
             <tr><td>2</td><td><a title='Only One'>C</a></td><td>6.0*</td></tr>\
             <tr><td>3</td><td>  Plain   Name  </td><td>7.0*</td></tr>",
        );

        let records = parser().parse(&html).unwrap();

        assert_eq!(records[0].name, "xBank B");
        assert_eq!(records[1].name, "C");
        assert_eq!(records[2].name, "Plain   Name");
    }

    #[test]
    fn test_empty_title_is_kept() {
        let html = table("<tr><td>1</td><td><a></a><a title=''>Shown</a></td><td>1.0*</td></tr>");

        let records = parser().parse(&html).unwrap();

        assert_eq!(records[0].name, "");
    }

    #[test]
    fn test_metric_drops_exactly_one_character() {
        let html = table(
            "<tr><td>1</td><td>A</td><td>12.5ab</td></tr>\
             <tr><td>2</td><td>B</td><td>12.5</td></tr>\
             <tr><td>3</td><td>C</td><td><b>99.0</b></td></tr>\
             <tr><td>4</td><td>D</td><td></td></tr>\
             <tr><td>5</td><td>E</td><td>-4.0*</td></tr>",
        );

        let parsed = parser().parse_with_report(&html).unwrap();
        let values: Vec<f64> = parsed.records.iter().map(|r| r.mc_usd_billion).collect();

        // "12.5" loses its last digit rather than the marker
        assert_eq!(values, vec![0.0, 12.0, 0.0, 0.0, 0.0]);
        assert_eq!(parsed.report.metric_defaults, 4);
    }

    #[test]
    fn test_only_first_tbody_is_used() {
        let html = "<table><tbody><tr><td>1</td><td>First</td><td>1.0*</td></tr></tbody></table>\
                    <table><tbody><tr><td>1</td><td>Second</td><td>2.0*</td></tr></tbody></table>";

        let records = parser().parse(html).unwrap();

        assert_eq!(records, vec![Record::new("First", 1.0)]);
    }

    #[test]
    fn test_missing_tbody_is_fatal() {
        let err = parser().parse("<html><body><p>No tables here</p></body></html>");
        assert_eq!(err, Err(ParseError::NoTableBody));
    }

    #[test]
    fn test_empty_tbody_is_fatal() {
        let err = parser().parse("<table><tbody></tbody></table>");
        assert_eq!(err, Err(ParseError::NoRows));
    }

    #[test]
    fn test_empty_schema_is_rejected() {
        assert_eq!(TableParser::new(vec![]).unwrap_err(), ParseError::EmptySchema);
    }

    #[test]
    fn test_parse_figure() {
        assert_eq!(parse_figure("100.5†"), Some(100.5));
        assert_eq!(parse_figure("432.92\n"), Some(432.92));
        assert_eq!(parse_figure(" 7.25 \n"), Some(7.25));
        assert_eq!(parse_figure(""), None);
        assert_eq!(parse_figure("x"), None);
        assert_eq!(parse_figure("1,234.5*"), None);
        assert_eq!(parse_figure("inf*"), None);
    }
}
