use cefkit_engine::EngineClient;

/// A client derived from the shared engine instance.
///
/// Clients are independent of each other; disposing one does not affect the
/// engine or other clients.
pub struct Client {
    inner: Box<dyn EngineClient>,
}

impl Client {
    pub(crate) fn new(inner: Box<dyn EngineClient>) -> Self {
        Self { inner }
    }

    /// Release the resources held by this client.
    pub fn dispose(&self) {
        self.inner.dispose();
    }
}
