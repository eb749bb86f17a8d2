// src/export.rs
//! Article table ordering and CSV export.
//!
//! Quoting follows RFC 4180: a field containing a comma, a double quote or
//! a line break is wrapped in quotes and embedded quotes are doubled.

use anyhow::{anyhow, Context, Result};
use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::clock::EvalTime;
use crate::model::Article;

pub const ARTICLE_EXPORT_HEADER: [&str; 7] = [
    "Title",
    "Source",
    "Company",
    "Sector",
    "Region",
    "Published",
    "Status",
];

/// Serialize a header row plus data rows. No trailing newline.
pub fn to_csv<H, R, F>(header: &[H], rows: &[R]) -> Result<String>
where
    H: AsRef<str>,
    R: AsRef<[F]>,
    F: AsRef<str>,
{
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    wtr.write_record(header.iter().map(|h| h.as_ref()))
        .context("writing csv header")?;
    for (i, row) in rows.iter().enumerate() {
        wtr.write_record(row.as_ref().iter().map(|f| f.as_ref()))
            .with_context(|| format!("writing csv row {i}"))?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| anyhow!("flushing csv writer: {}", e.error()))?;
    let mut out = String::from_utf8(bytes).context("csv output is not utf-8")?;
    if out.ends_with('\n') {
        out.pop();
    }
    Ok(out)
}

/// Filtered articles newest first; equal timestamps keep input order.
pub fn sorted_by_recency<'a>(articles: &[&'a Article]) -> Vec<&'a Article> {
    let mut sorted = articles.to_vec();
    sorted.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    sorted
}

/// One export row per article, columns as in [`ARTICLE_EXPORT_HEADER`].
pub fn article_rows(articles: &[&Article], time: &EvalTime) -> Vec<Vec<String>> {
    sorted_by_recency(articles)
        .into_iter()
        .map(|a| {
            vec![
                a.title.clone(),
                a.source.clone(),
                a.company_name.clone(),
                a.sector.clone(),
                a.region.clone(),
                time.format_minute(a.published_at),
                a.status.label().to_string(),
            ]
        })
        .collect()
}

pub fn export_articles_csv(articles: &[&Article], time: &EvalTime) -> Result<String> {
    to_csv(&ARTICLE_EXPORT_HEADER, &article_rows(articles, time))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_fields_are_not_quoted() {
        let out = to_csv(&["a", "b"], &[vec!["1", "two"]]).unwrap();
        assert_eq!(out, "a,b\n1,two");
    }

    #[test]
    fn special_fields_are_quoted_and_escaped() {
        let out = to_csv(&["t"], &[vec![r#"Say "hi", then go"#], vec!["line\nbreak"]]).unwrap();
        assert_eq!(out, "t\n\"Say \"\"hi\"\", then go\"\n\"line\nbreak\"");
    }

    #[test]
    fn ragged_rows_are_an_error() {
        let err = to_csv(&["a", "b"], &[vec!["only one"]]).unwrap_err();
        assert!(format!("{err:#}").contains("row 0"));
    }
}
