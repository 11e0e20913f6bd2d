//! Reading sample metadata.

mod error;
mod text;

pub use error::ReadError;
pub use text::TextReader;

use crate::SampleTable;

pub trait SampleRead {
    /// Read every sample, in time order.
    fn read_samples(&self) -> Result<SampleTable, ReadError>;
}
