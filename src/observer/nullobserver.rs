use super::Observer;

/// Observer doing nothing
pub struct NullObserver;

impl<F> Observer<F> for NullObserver {}
