use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReadError {
    #[error("{file}:{line}: expected between {min} and {max} columns, found {found}")]
    ColumnCount {
        file: String,
        line: usize,
        min: usize,
        max: usize,
        found: usize,
    },

    #[error("{file}:{line}: couldn't parse {column} value '{value}'")]
    Parse {
        file: String,
        line: usize,
        column: &'static str,
        value: String,
    },

    #[error("{file}: {source}")]
    Table {
        file: String,
        source: crate::GroupingError,
    },

    #[error("Couldn't read {file}: {source}")]
    IO {
        file: String,
        source: std::io::Error,
    },
}
