use thiserror::Error;

mod request_state_test;
mod tracker_test;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TestError {
    #[error("{0}")]
    Failed(String),
}

impl TestError {
    pub fn failed(message: impl Into<String>) -> Self {
        TestError::Failed(message.into())
    }
}
