use thiserror::Error;

#[derive(Clone, Debug, PartialEq)]
pub struct Widget {
    pub name: String,
}

impl Widget {
    pub fn named(name: &str) -> Self {
        Widget {
            name: name.to_string(),
        }
    }
}

#[derive(Error, Clone, Debug, PartialEq)]
pub enum FetchError {
    #[error("{0}")]
    Failed(String),
}

impl FetchError {
    pub fn failed(message: &str) -> Self {
        FetchError::Failed(message.to_string())
    }
}
