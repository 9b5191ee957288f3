use anyhow::Context;
use flate2::read::GzDecoder;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

const READ_BUFFER: usize = 128 * 1024; // 128 KB

pub fn unescape_sql_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                match next {
                    '\\' => result.push('\\'),
                    '\'' => result.push('\''),
                    '"' => result.push('"'),
                    'n' => result.push('\n'),
                    'r' => result.push('\r'),
                    't' => result.push('\t'),
                    '0' => result.push('\0'),
                    _ => {
                        // Unknown escape, keep both
                        result.push('\\');
                        result.push(next);
                    }
                }
            } else {
                result.push('\\');
            }
        } else {
            result.push(c);
        }
    }
    result
}

/// Buffered reader over a file, transparently gunzipped when the name ends in `.gz`.
/// The bar tracks compressed bytes read.
pub fn open_with_progress(path: &Path) -> anyhow::Result<(Box<dyn BufRead>, ProgressBar)> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let file_size = file.metadata()?.len();

    let buf_reader = BufReader::with_capacity(READ_BUFFER, file);

    let pb = ProgressBar::new(file_size);
    pb.set_style(
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta}) {msg}",
        )?
        .progress_chars("=>-"),
    );
    if let Some(name) = path.file_name() {
        pb.set_message(name.to_string_lossy().into_owned());
    }
    let pb_reader = pb.wrap_read(buf_reader);

    let is_gz = path.extension().is_some_and(|ext| ext == "gz");
    let reader: Box<dyn Read> = if is_gz {
        Box::new(GzDecoder::new(pb_reader))
    } else {
        Box::new(pb_reader)
    };

    Ok((Box::new(BufReader::with_capacity(READ_BUFFER, reader)), pb))
}
