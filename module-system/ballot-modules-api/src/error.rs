/// General error type in the Module System.
#[derive(Debug, thiserror::Error)]
pub enum ModuleError {
    /// Custom error thrown by a module.
    #[error(transparent)]
    ModuleError(#[from] anyhow::Error),
}

impl ModuleError {
    /// Returns the module's own error type, if that is what caused the failure.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: std::fmt::Display + std::fmt::Debug + Send + Sync + 'static,
    {
        match self {
            ModuleError::ModuleError(err) => err.downcast_ref::<E>(),
        }
    }

    /// Unwraps the underlying [`anyhow::Error`].
    pub fn into_inner(self) -> anyhow::Error {
        match self {
            ModuleError::ModuleError(err) => err,
        }
    }
}
