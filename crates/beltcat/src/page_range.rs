//! Page selection strings such as `"24"` or `"1,3-5"`.

use crate::error::SourceError;

/// Parse a page selection into sorted, de-duplicated 0-based page indices.
///
/// Input pages are 1-based. Empty parts are ignored; page 0, reversed
/// ranges and pages beyond `page_count` are errors.
pub fn parse_page_range(input: &str, page_count: usize) -> Result<Vec<usize>, SourceError> {
    let mut pages = Vec::new();

    for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (first, last) = match part.split_once('-') {
            Some((a, b)) => (page_number(a, page_count)?, page_number(b, page_count)?),
            None => {
                let p = page_number(part, page_count)?;
                (p, p)
            }
        };
        if first > last {
            return Err(SourceError::PageRange(format!(
                "range '{part}' runs backwards"
            )));
        }
        pages.extend((first - 1)..last);
    }

    if pages.is_empty() {
        return Err(SourceError::PageRange(format!("no pages selected by '{input}'")));
    }
    pages.sort_unstable();
    pages.dedup();
    Ok(pages)
}

fn page_number(text: &str, page_count: usize) -> Result<usize, SourceError> {
    let text = text.trim();
    let page: usize = text
        .parse()
        .map_err(|_| SourceError::PageRange(format!("invalid page number: '{text}'")))?;
    if page == 0 {
        return Err(SourceError::PageRange(
            "page 0 is invalid (pages start at 1)".to_string(),
        ));
    }
    if page > page_count {
        return Err(SourceError::PageRange(format!(
            "page {page} exceeds document page count ({page_count})"
        )));
    }
    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(err: SourceError) -> String {
        err.to_string()
    }

    #[test]
    fn single_page() {
        assert_eq!(parse_page_range("24", 30).unwrap(), vec![23]);
    }

    #[test]
    fn span_and_list() {
        assert_eq!(parse_page_range("1,3-5", 5).unwrap(), vec![0, 2, 3, 4]);
    }

    #[test]
    fn sorted_and_deduplicated() {
        assert_eq!(parse_page_range("5,1-3,2", 5).unwrap(), vec![0, 1, 2, 4]);
    }

    #[test]
    fn whitespace_tolerated() {
        assert_eq!(parse_page_range(" 2 , 4 - 5 ", 5).unwrap(), vec![1, 3, 4]);
    }

    #[test]
    fn page_zero_rejected() {
        assert!(message(parse_page_range("0", 5).unwrap_err()).contains("page 0"));
    }

    #[test]
    fn beyond_page_count_rejected() {
        assert!(message(parse_page_range("2-6", 5).unwrap_err()).contains("exceeds"));
    }

    #[test]
    fn reversed_range_rejected() {
        assert!(message(parse_page_range("4-2", 5).unwrap_err()).contains("backwards"));
    }

    #[test]
    fn garbage_rejected() {
        assert!(message(parse_page_range("a-b", 5).unwrap_err()).contains("invalid page number"));
        assert!(parse_page_range(",", 5).is_err());
    }
}
