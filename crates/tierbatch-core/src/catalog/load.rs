//! CSV task loader: `size,deadline,id,crucial[,category]`.
//!
//! A first line mentioning both `size` and `deadline` is a header. Rows with
//! fewer than four parseable fields are dropped.

use std::fs;
use std::path::Path;

use crate::model::Tier;

use super::{Catalog, CatalogError, Job};

/// Read and parse a task file into a validated catalog.
pub fn load_from_path(path: &Path) -> Result<Catalog, CatalogError> {
    let text = fs::read_to_string(path).map_err(|source| CatalogError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let jobs = parse_rows(&text);
    if jobs.is_empty() {
        return Err(CatalogError::NoRows(path.to_path_buf()));
    }
    tracing::debug!(path = %path.display(), jobs = jobs.len(), "loaded task file");
    Catalog::new(jobs)
}

/// Parse CSV text into jobs, skipping an optional header and malformed rows.
pub fn parse_rows(text: &str) -> Vec<Job> {
    let mut lines = text.lines().peekable();
    if let Some(first) = lines.peek() {
        if is_header(first) {
            lines.next();
        }
    }

    let mut jobs = Vec::new();
    for (n, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_row(line) {
            Some(job) => jobs.push(job),
            None => tracing::debug!(row = n, line, "dropping malformed task row"),
        }
    }
    jobs
}

fn is_header(line: &str) -> bool {
    line.contains("size") && line.contains("deadline")
}

fn parse_row(line: &str) -> Option<Job> {
    let mut fields = line.splitn(5, ',');
    let size: i64 = fields.next()?.trim().parse().ok()?;
    let deadline: f64 = fields.next()?.trim().parse().ok()?;
    let id = fields.next()?.trim();
    if id.is_empty() {
        return None;
    }
    let crucial: i64 = fields.next()?.trim().parse().ok()?;
    let category = fields.next().map(str::trim_end).unwrap_or_default();

    let id = if category.is_empty() {
        id.to_string()
    } else {
        format!("{}_{}", id, category)
    };
    Some(Job::new(id, tier_from_size(size), deadline, crucial != 0))
}

/// Accepts a 1-based tier index or a raw resolution; anything else clamps to
/// the smallest tier.
fn tier_from_size(size: i64) -> Tier {
    let tier = u32::try_from(size).ok().and_then(|s| match s {
        1..=4 => Tier::new(s as usize - 1),
        px => Tier::from_resolution(px),
    });
    tier.unwrap_or_else(|| {
        tracing::warn!(size, "unknown task size; using smallest tier");
        Tier::SMALLEST
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn tier(i: usize) -> Tier {
        Tier::new(i).unwrap()
    }

    #[test]
    fn parse_rows_skips_header() {
        let text = "size,deadline,id,crucial,category\n2,10.5,img_1,1,cat\n4,12,img_2,0,dog\n";
        let jobs = parse_rows(text);
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].id(), "img_1_cat");
        assert_eq!(jobs[0].native_tier(), tier(1));
        assert!(jobs[0].crucial());
        assert_eq!(jobs[1].native_tier(), tier(3));
        assert!(!jobs[1].crucial());
        assert!((jobs[0].deadline() - 10.5).abs() < 1e-9);
    }

    #[test]
    fn parse_rows_without_header_keeps_first_row() {
        let jobs = parse_rows("1,3.0,a,0\n2,3.0,b,1\n");
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].id(), "a");
        assert_eq!(jobs[1].id(), "b");
    }

    #[test]
    fn parse_rows_drops_malformed() {
        let text = "1,3.0,a,0\nnot,a,row\n2,x,b,1\n\n3,4.0,c\n3,4.0,d,1\n";
        let ids: Vec<_> = parse_rows(text).iter().map(|j| j.id().to_string()).collect();
        assert_eq!(ids, vec!["a", "d"]);
    }

    #[test]
    fn parse_rows_accepts_resolutions_and_clamps_unknown() {
        let jobs = parse_rows("512,1,a,1\n128,1,b,0\n9,1,c,0\n");
        assert_eq!(jobs[0].native_tier(), tier(3));
        assert_eq!(jobs[1].native_tier(), tier(1));
        assert_eq!(jobs[2].native_tier(), Tier::SMALLEST);
    }

    #[test]
    fn parse_rows_any_non_zero_flag_is_crucial() {
        let jobs = parse_rows("1,2.0,a,0\n1,2.0,b,1\n1,2.0,c,2\n1,2.0,d,-1\n");
        let flags: Vec<_> = jobs.iter().map(Job::crucial).collect();
        assert_eq!(flags, vec![false, true, true, true]);
    }

    #[test]
    fn parse_rows_trims_category_and_crlf() {
        let jobs = parse_rows("1,2.0,a,1,bird \r\n");
        assert_eq!(jobs[0].id(), "a_bird");
    }

    #[test]
    fn load_from_path_reads_file() {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(b"size,deadline,id,crucial\n1,5.0,a,1\n2,4.0,b,0\n")
            .unwrap();
        f.flush().unwrap();
        let catalog = load_from_path(f.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.global_deadline(), 4.0);
    }

    #[test]
    fn load_from_path_errors() {
        let missing = load_from_path(Path::new("/nonexistent/tasks.csv"));
        assert!(matches!(missing, Err(CatalogError::Unreadable { .. })));

        let mut f = NamedTempFile::new().unwrap();
        f.write_all(b"size,deadline,id,crucial\n").unwrap();
        f.flush().unwrap();
        assert!(matches!(load_from_path(f.path()), Err(CatalogError::NoRows(_))));
    }
}
