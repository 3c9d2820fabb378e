use std::fmt;

/// A numeric error code reported by the context backend.
///
/// The values follow EGL so native backends can pass their codes straight
/// through and logs stay readable either way.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ErrorCode(pub u32);

impl ErrorCode {
    pub const SUCCESS: Self = Self(0x3000);
    pub const NOT_INITIALIZED: Self = Self(0x3001);
    pub const BAD_ACCESS: Self = Self(0x3002);
    pub const BAD_ALLOC: Self = Self(0x3003);
    pub const BAD_ATTRIBUTE: Self = Self(0x3004);
    pub const BAD_CONFIG: Self = Self(0x3005);
    pub const BAD_CONTEXT: Self = Self(0x3006);
    pub const BAD_CURRENT_SURFACE: Self = Self(0x3007);
    pub const BAD_DISPLAY: Self = Self(0x3008);
    pub const BAD_MATCH: Self = Self(0x3009);
    pub const BAD_NATIVE_PIXMAP: Self = Self(0x300A);
    pub const BAD_NATIVE_WINDOW: Self = Self(0x300B);
    pub const BAD_PARAMETER: Self = Self(0x300C);
    pub const BAD_SURFACE: Self = Self(0x300D);
    pub const CONTEXT_LOST: Self = Self(0x300E);

    fn name(&self) -> Option<&'static str> {
        let name = match *self {
            Self::SUCCESS => "EGL_SUCCESS",
            Self::NOT_INITIALIZED => "EGL_NOT_INITIALIZED",
            Self::BAD_ACCESS => "EGL_BAD_ACCESS",
            Self::BAD_ALLOC => "EGL_BAD_ALLOC",
            Self::BAD_ATTRIBUTE => "EGL_BAD_ATTRIBUTE",
            Self::BAD_CONFIG => "EGL_BAD_CONFIG",
            Self::BAD_CONTEXT => "EGL_BAD_CONTEXT",
            Self::BAD_CURRENT_SURFACE => "EGL_BAD_CURRENT_SURFACE",
            Self::BAD_DISPLAY => "EGL_BAD_DISPLAY",
            Self::BAD_MATCH => "EGL_BAD_MATCH",
            Self::BAD_NATIVE_PIXMAP => "EGL_BAD_NATIVE_PIXMAP",
            Self::BAD_NATIVE_WINDOW => "EGL_BAD_NATIVE_WINDOW",
            Self::BAD_PARAMETER => "EGL_BAD_PARAMETER",
            Self::BAD_SURFACE => "EGL_BAD_SURFACE",
            Self::CONTEXT_LOST => "EGL_CONTEXT_LOST",
            _ => return None,
        };
        Some(name)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "0x{:x}", self.0),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn known_codes_display_by_name() {
        assert_eq!(ErrorCode::BAD_DISPLAY.to_string(), "EGL_BAD_DISPLAY");
        assert_eq!(ErrorCode(0x3000).to_string(), "EGL_SUCCESS");
    }

    #[test]
    fn unknown_codes_display_as_hex() {
        assert_eq!(ErrorCode(0x1234).to_string(), "0x1234");
    }
}
