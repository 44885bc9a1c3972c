use super::Result;
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufReader, Read as ioRead};
use std::path::Path;

/// Opens a plain or gzip-compressed text table (gene model, coverage).
pub fn open_table_reader(path: &Path) -> Result<BufReader<Box<dyn ioRead>>> {
    fn is_gzipped(path: &Path) -> bool {
        let path_str = path.to_string_lossy().to_lowercase();
        path_str.ends_with(".gz") || path_str.ends_with(".gzip")
    }
    let file = File::open(path).map_err(|e| format!("File {}: {}", path.display(), e))?;
    if is_gzipped(path) {
        let gz_decoder = MultiGzDecoder::new(file);
        if gz_decoder.header().is_some() {
            Ok(BufReader::new(Box::new(gz_decoder)))
        } else {
            Err(format!("Invalid gzip header: {}", path.to_string_lossy()))
        }
    } else {
        Ok(BufReader::new(Box::new(file)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::{write::GzEncoder, Compression};
    use std::io::{BufRead, Write};

    #[test]
    fn open_plain_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gene.tsv");
        std::fs::write(&path, "gene CYP2D6\nunique e1\n").unwrap();
        let lines: Vec<String> = open_table_reader(&path)
            .unwrap()
            .lines()
            .map(|l| l.unwrap())
            .collect();
        assert_eq!(lines, vec!["gene CYP2D6", "unique e1"]);
    }

    #[test]
    fn open_gzipped_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("coverage.tsv.gz");
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"region 0 e1 2.0\n").unwrap();
        std::fs::write(&path, encoder.finish().unwrap()).unwrap();
        let mut line = String::new();
        open_table_reader(&path)
            .unwrap()
            .read_line(&mut line)
            .unwrap();
        assert_eq!(line, "region 0 e1 2.0\n");
    }

    #[test]
    fn open_missing_table_err() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.tsv");
        assert!(open_table_reader(&path).is_err());
    }
}
