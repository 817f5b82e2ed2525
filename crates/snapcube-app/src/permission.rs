/// Outcome of a camera permission request.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

impl PermissionStatus {
    #[inline]
    pub fn is_granted(self) -> bool {
        self == PermissionStatus::Granted
    }
}

/// Platform permission prompt.
pub trait PermissionProvider {
    fn request_permission(&mut self) -> PermissionStatus;
}
