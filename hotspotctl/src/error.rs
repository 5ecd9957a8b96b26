//! Error module
//!

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Status {
    #[error("Bad {0} duration {1:?}: {2}")]
    BadDuration(String, String, String),
    #[error("Can not write {0}: {1}")]
    Output(String, String),
}
