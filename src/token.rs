/// Authenticated caller identity, passed explicitly into batch rendering.
/// Converters never fetch identity from ambient state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityToken {
    pub owner_id: String,
    pub viewer_id: String,
    pub app_id: String,
    pub domain: String,
}

impl SecurityToken {
    /// Sentinel id for unauthenticated callers.
    pub const ANONYMOUS: &'static str = "-1";

    pub fn new(
        owner_id: impl Into<String>,
        viewer_id: impl Into<String>,
        app_id: impl Into<String>,
        domain: impl Into<String>,
    ) -> Self {
        Self {
            owner_id: owner_id.into(),
            viewer_id: viewer_id.into(),
            app_id: app_id.into(),
            domain: domain.into(),
        }
    }

    pub fn anonymous() -> Self {
        Self {
            owner_id: Self::ANONYMOUS.into(),
            viewer_id: Self::ANONYMOUS.into(),
            app_id: Self::ANONYMOUS.into(),
            domain: String::new(),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.viewer_id == Self::ANONYMOUS
    }
}
