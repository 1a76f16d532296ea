//! Delimited export of a feature matrix
//!
//! ```text
//! author,lexical/avg_line_length,...,syntactic/node_type_tf/if_statement
//! alice,31.5,...,4
//! bob,28,...,
//! ```
//!
//! Missing cells are written as an empty field or `NaN`. Values use Rust's
//! shortest round-trip float formatting, so parsing a field gives back the
//! exact value.

use super::FeatureMatrix;
use crate::error::FeatureError;
use crate::models::author_of;
use serde::Deserialize;
use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;

/// How a missing cell is written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingMarker {
    #[default]
    Empty,
    Nan,
}

impl FromStr for MissingMarker {
    type Err = FeatureError;

    fn from_str(s: &str) -> Result<Self, FeatureError> {
        match s {
            "empty" => Ok(MissingMarker::Empty),
            "nan" => Ok(MissingMarker::Nan),
            other => Err(FeatureError::Config(format!(
                "unknown missing marker `{}` (expected empty or nan)",
                other
            ))),
        }
    }
}

impl MissingMarker {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissingMarker::Empty => "",
            MissingMarker::Nan => "NaN",
        }
    }
}

/// Optional leading column identifying each row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowLabel {
    #[default]
    None,
    Path,
    Author,
}

impl FromStr for RowLabel {
    type Err = FeatureError;

    fn from_str(s: &str) -> Result<Self, FeatureError> {
        match s {
            "none" => Ok(RowLabel::None),
            "path" => Ok(RowLabel::Path),
            "author" => Ok(RowLabel::Author),
            other => Err(FeatureError::Config(format!(
                "unknown row label `{}` (expected none, path or author)",
                other
            ))),
        }
    }
}

impl RowLabel {
    fn header(&self) -> Option<&'static str> {
        match self {
            RowLabel::None => None,
            RowLabel::Path => Some("path"),
            RowLabel::Author => Some("author"),
        }
    }

    fn for_path(&self, path: &Path) -> Option<String> {
        match self {
            RowLabel::None => None,
            RowLabel::Path => Some(path.display().to_string()),
            RowLabel::Author => Some(author_of(path).unwrap_or_default().to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct CsvOptions {
    pub missing: MissingMarker,
    pub label: RowLabel,
}

/// Quote a field if it contains a delimiter, quote or line break
fn escape(field: &str) -> std::borrow::Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\"")).into()
    } else {
        field.into()
    }
}

impl FeatureMatrix {
    /// Write the matrix as CSV: a header of feature names, then one line per row.
    pub fn write_csv<W: Write>(&self, mut writer: W, options: &CsvOptions) -> io::Result<()> {
        let mut header: Vec<std::borrow::Cow<'_, str>> = Vec::with_capacity(self.n_cols() + 1);
        if let Some(label) = options.label.header() {
            header.push(label.into());
        }
        header.extend(self.columns().iter().map(|c| escape(c)));
        writeln!(writer, "{}", header.join(","))?;

        for (i, row) in self.rows().enumerate() {
            let mut fields: Vec<String> = Vec::with_capacity(row.len() + 1);
            if let Some(label) = options.label.for_path(self.path(i)) {
                fields.push(escape(&label).into_owned());
            }
            fields.extend(row.iter().map(|cell| match cell {
                Some(value) => value.to_string(),
                None => options.missing.as_str().to_string(),
            }));
            writeln!(writer, "{}", fields.join(","))?;
        }

        writer.flush()
    }

    /// CSV as a string
    pub fn to_csv_string(&self, options: &CsvOptions) -> String {
        let mut buf = Vec::new();
        // Writing to a Vec cannot fail.
        let _ = self.write_csv(&mut buf, options);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureSet;
    use std::path::PathBuf;

    #[test]
    fn test_option_names() {
        assert_eq!("nan".parse::<MissingMarker>().unwrap(), MissingMarker::Nan);
        assert_eq!("empty".parse::<MissingMarker>().unwrap(), MissingMarker::Empty);
        assert!("NaN".parse::<MissingMarker>().is_err());
        assert_eq!("author".parse::<RowLabel>().unwrap(), RowLabel::Author);
        assert_eq!("none".parse::<RowLabel>().unwrap(), RowLabel::None);
        assert!("user".parse::<RowLabel>().is_err());
    }

    fn matrix() -> FeatureMatrix {
        let sets: Vec<FeatureSet> = vec![
            [("a", 1.0), ("b", 2.5)].into_iter().collect(),
            [("b", 3.0), ("c", 0.1)].into_iter().collect(),
            [("a", 5.0)].into_iter().collect(),
        ];
        let paths = vec![
            PathBuf::from("corpus/alice.java"),
            PathBuf::from("corpus/bob.java"),
            PathBuf::from("corpus/carol.java"),
        ];
        FeatureMatrix::from_feature_sets(paths, &sets).unwrap()
    }

    #[test]
    fn test_csv_empty_marker() {
        let csv = matrix().to_csv_string(&CsvOptions::default());
        assert_eq!(csv, "a,b,c\n1,2.5,\n,3,0.1\n5,,\n");
    }

    #[test]
    fn test_csv_nan_marker_with_author() {
        let options = CsvOptions {
            missing: MissingMarker::Nan,
            label: RowLabel::Author,
        };
        let csv = matrix().to_csv_string(&options);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "author,a,b,c");
        assert_eq!(lines[1], "alice,1,2.5,NaN");
        assert_eq!(lines[3], "carol,5,NaN,NaN");
    }

    #[test]
    fn test_values_round_trip() {
        let csv = matrix().to_csv_string(&CsvOptions::default());
        let field = csv.lines().nth(2).unwrap().split(',').nth(2).unwrap();
        assert_eq!(field.parse::<f64>().unwrap(), 0.1);
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("a,b"), "\"a,b\"");
        assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape("x\ny"), "\"x\ny\"");
    }

    #[test]
    fn test_feature_names_with_commas_are_quoted() {
        let sets: Vec<FeatureSet> =
            vec![[("lexical/word_unigram_tf/\"a,b\"", 1.0)].into_iter().collect()];
        let m = FeatureMatrix::from_feature_sets(vec![PathBuf::from("x.java")], &sets).unwrap();
        let csv = m.to_csv_string(&CsvOptions::default());
        assert_eq!(csv.lines().next(), Some("\"lexical/word_unigram_tf/\"\"a,b\"\"\""));
    }

    #[test]
    fn test_deserialize_options() {
        let options: CsvOptions = toml::from_str("missing = \"nan\"\nlabel = \"path\"").unwrap();
        assert_eq!(options.missing, MissingMarker::Nan);
        assert_eq!(options.label, RowLabel::Path);
    }
}
