use serde::Serialize;

/// OS family the process is running on. Drives keychain backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Platform {
    Windows,
    #[serde(rename = "macOS")]
    MacOs,
    Linux,
    Unknown,
}

impl Platform {
    /// Identify the running OS. Infallible: anything we do not recognize
    /// maps to [`Platform::Unknown`], never an error.
    pub fn detect() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(target_os = "linux") {
            Platform::Linux
        } else {
            Platform::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Windows => "Windows",
            Platform::MacOs => "macOS",
            Platform::Linux => "Linux",
            Platform::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_never_panics() {
        let _ = Platform::detect();
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_detect_linux() {
        assert_eq!(Platform::detect(), Platform::Linux);
    }

    #[cfg(target_os = "macos")]
    #[test]
    fn test_detect_macos() {
        assert_eq!(Platform::detect(), Platform::MacOs);
    }

    #[cfg(target_os = "windows")]
    #[test]
    fn test_detect_windows() {
        assert_eq!(Platform::detect(), Platform::Windows);
    }

    #[test]
    fn test_display_strings() {
        assert_eq!(Platform::Windows.to_string(), "Windows");
        assert_eq!(Platform::MacOs.to_string(), "macOS");
        assert_eq!(Platform::Linux.to_string(), "Linux");
        assert_eq!(Platform::Unknown.to_string(), "Unknown");
    }
}
