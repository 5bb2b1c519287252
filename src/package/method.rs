use std::fmt;
use clap::ValueEnum;

/// Third-party tool that turns the staging directory into a portable image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BundleMethod {
    /// Generic `appimagetool`, downloaded on first use
    #[value(name = "appimagetool")]
    AppImageTool,
    /// BeeWare `briefcase`
    #[value(name = "briefcase")]
    Briefcase,
    /// `python-appimage` helper
    #[value(name = "python-appimage")]
    PythonAppImage,
}

impl BundleMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            BundleMethod::AppImageTool => "appimagetool",
            BundleMethod::Briefcase => "briefcase",
            BundleMethod::PythonAppImage => "python-appimage",
        }
    }

    /// Extra pip package the backend needs inside the venv.
    pub fn pip_package(&self) -> Option<&'static str> {
        match self {
            BundleMethod::AppImageTool => None,
            BundleMethod::Briefcase => Some("briefcase"),
            BundleMethod::PythonAppImage => Some("python-appimage"),
        }
    }
}

impl fmt::Display for BundleMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_names_match_display() {
        for method in BundleMethod::value_variants() {
            let value = method.to_possible_value().unwrap();
            assert_eq!(value.get_name(), method.to_string());
        }
    }

    #[test]
    fn only_python_backends_need_pip_packages() {
        assert_eq!(BundleMethod::AppImageTool.pip_package(), None);
        assert_eq!(BundleMethod::Briefcase.pip_package(), Some("briefcase"));
        assert_eq!(BundleMethod::PythonAppImage.pip_package(), Some("python-appimage"));
    }
}
