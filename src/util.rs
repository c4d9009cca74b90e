use std::io::Write;
use std::path::Path;

/// Reduce a company/project name to a filesystem-safe token.
///
/// Keeps ASCII alphanumerics, maps accented vowels and `ñ` to their plain
/// forms (roster headers are Spanish), and collapses everything else into
/// single underscores.
///
/// Example: "Constructora Río Alto S.A.C." → "Constructora_Rio_Alto_S_A_C"
pub fn sanitize_for_filesystem(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_was_sep = true;

    for c in name.chars() {
        let mapped = match c {
            'á' | 'à' | 'ä' => Some('a'),
            'é' | 'è' | 'ë' => Some('e'),
            'í' | 'ì' | 'ï' => Some('i'),
            'ó' | 'ò' | 'ö' => Some('o'),
            'ú' | 'ù' | 'ü' => Some('u'),
            'ñ' => Some('n'),
            'Á' | 'À' | 'Ä' => Some('A'),
            'É' | 'È' | 'Ë' => Some('E'),
            'Í' | 'Ì' | 'Ï' => Some('I'),
            'Ó' | 'Ò' | 'Ö' => Some('O'),
            'Ú' | 'Ù' | 'Ü' => Some('U'),
            'Ñ' => Some('N'),
            c if c.is_ascii_alphanumeric() => Some(c),
            _ => None,
        };

        match mapped {
            Some(c) => {
                out.push(c);
                last_was_sep = false;
            }
            None => {
                if !last_was_sep {
                    out.push('_');
                    last_was_sep = true;
                }
            }
        }
    }

    out.trim_end_matches('_').to_string()
}

/// Write `content` to `path` atomically: stage into a temp file in the same
/// directory, flush, then rename over the target. A crash mid-write leaves
/// the previous file intact.
pub fn atomic_write_str(path: &Path, content: &str) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
