use crate::util;
use anyhow::bail;
use std::io::BufRead;
use std::path::Path;

/// Leading `(id,namespace,'title'` of a redirect or linktarget tuple.
/// ex: (10,0,'Computer_accessibility' -> rd_from, rd_namespace, rd_title
pub const TITLE_TUPLE: &str = r"\((\d+),(-?\d+),'((?:[^'\\]|\\.)*)'";

/// Streams every `INSERT INTO `table` VALUES ...` line of a MediaWiki SQL dump.
pub fn for_each_insert_line<F>(path: &Path, table: &str, mut visit: F) -> anyhow::Result<()>
where
    F: FnMut(&[u8]) -> anyhow::Result<()>,
{
    let (mut reader, pb) = util::open_with_progress(path)?;
    let prefix = format!("INSERT INTO `{}` VALUES ", table);
    let prefix = prefix.as_bytes();

    // regex on whole lines was too slow for pagelinks, read raw bytes instead
    let mut line_buf = Vec::new();
    while reader.read_until(b'\n', &mut line_buf)? != 0 {
        if line_buf.starts_with(prefix) {
            visit(&line_buf[prefix.len()..])?;
        }
        line_buf.clear();
    }

    pb.finish_and_clear();
    Ok(())
}

/// Splits the `(a,b,'c'),(d,e,'f');` tail of an INSERT line into tuples of raw fields.
/// Quoted fields come back without their quotes but still escaped.
pub fn for_each_tuple<F>(values: &[u8], mut visit: F) -> anyhow::Result<()>
where
    F: FnMut(&[&[u8]]) -> anyhow::Result<()>,
{
    let len = values.len();
    let mut i = 0;
    let mut fields: Vec<&[u8]> = Vec::with_capacity(16);

    while i < len {
        if values[i] != b'(' {
            i += 1;
            continue;
        }
        i += 1; // skip '('
        fields.clear();

        loop {
            if i >= len {
                bail!("unterminated tuple in dump line");
            }
            if values[i] == b'\'' {
                i += 1; // skip opening quote
                let start = i;
                while i < len && values[i] != b'\'' {
                    if values[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
                if i >= len {
                    bail!("unterminated string in dump line");
                }
                fields.push(&values[start..i]);
                i += 1; // skip closing quote
            } else {
                let start = i;
                while i < len && values[i] != b',' && values[i] != b')' {
                    i += 1;
                }
                fields.push(&values[start..i]);
            }

            match values.get(i) {
                Some(b',') => i += 1,
                Some(b')') => {
                    i += 1;
                    break;
                }
                _ => bail!("malformed tuple in dump line"),
            }
        }

        visit(&fields)?;
    }

    Ok(())
}

pub fn parse_u32(field: &[u8], column: &str) -> anyhow::Result<u32> {
    match atoi::atoi::<u32>(field) {
        Some(v) => Ok(v),
        None => bail!("invalid {}: {:?}", column, String::from_utf8_lossy(field)),
    }
}

pub fn parse_u64(field: &[u8], column: &str) -> anyhow::Result<u64> {
    match atoi::atoi::<u64>(field) {
        Some(v) => Ok(v),
        None => bail!("invalid {}: {:?}", column, String::from_utf8_lossy(field)),
    }
}

pub fn parse_i32(field: &[u8], column: &str) -> anyhow::Result<i32> {
    match atoi::atoi::<i32>(field) {
        Some(v) => Ok(v),
        None => bail!("invalid {}: {:?}", column, String::from_utf8_lossy(field)),
    }
}

pub fn parse_title(field: &[u8]) -> String {
    util::unescape_sql_string(&String::from_utf8_lossy(field))
}
