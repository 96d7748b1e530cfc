use std::fmt::Display;

pub trait ResultExt<T, InitialError> {
    /// Map an error to a string-carrying error variant
    ///
    /// Converts `Result<T, InitialError>` into `Result<T, FinalError>` using the
    /// Display output of the initial error, handy for platform errors that only
    /// carry a human readable reason.
    ///
    /// # Example
    /// ```rust
    /// use tagbridge_util::result_ext::ResultExt;
    ///
    /// #[derive(Debug, thiserror::Error)]
    /// enum TagError {
    ///     #[error("read failed: {0}")]
    ///     Read(String),
    /// }
    ///
    /// fn read() -> Result<u8, TagError> {
    ///     "x".parse::<u8>().map_err_str(TagError::Read)
    /// }
    ///
    /// assert!(read().is_err());
    /// ```
    fn map_err_str<FinalError, F>(self, f: F) -> Result<T, FinalError>
    where
        InitialError: Display,
        F: FnOnce(String) -> FinalError;
}

impl<Type, InitialError> ResultExt<Type, InitialError> for Result<Type, InitialError> {
    fn map_err_str<FinalError, F>(self, f: F) -> Result<Type, FinalError>
    where
        InitialError: Display,
        F: FnOnce(String) -> FinalError,
    {
        self.map_err(|e| f(e.to_string()))
    }
}
