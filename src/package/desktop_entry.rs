use std::fmt;

pub const APP_ID: &str = "kid3-tag-copy";
pub const APP_NAME: &str = "Kid3 Tag Copy";

/// Freedesktop `.desktop` launcher for the bundled application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopEntry {
    pub name: String,
    pub comment: String,
    pub exec: String,
    pub icon: String,
    pub categories: Vec<String>,
    pub version: String,
}

impl DesktopEntry {
    pub fn for_version(version: &str) -> Self {
        Self {
            name: APP_NAME.to_string(),
            comment: "Copy tags between audio files using kid3-cli".to_string(),
            exec: APP_ID.to_string(),
            icon: APP_ID.to_string(),
            categories: vec!["AudioVideo".to_string(), "Audio".to_string()],
            version: version.to_string(),
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.desktop", self.icon)
    }
}

impl fmt::Display for DesktopEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[Desktop Entry]")?;
        writeln!(f, "Type=Application")?;
        writeln!(f, "Name={}", self.name)?;
        writeln!(f, "Comment={}", self.comment)?;
        writeln!(f, "Exec={}", self.exec)?;
        writeln!(f, "Icon={}", self.icon)?;
        let mut categories = self.categories.join(";");
        categories.push(';');
        writeln!(f, "Categories={}", categories)?;
        writeln!(f, "Terminal=false")?;
        writeln!(f, "X-AppImage-Version={}", self.version)
    }
}

/// AppDir launcher: runs the entry point with the bundled venv.
pub fn app_run_script(entry_file_name: &str) -> String {
    format!(
        "#!/bin/sh\n\
         HERE=\"$(dirname \"$(readlink -f \"$0\")\")\"\n\
         export PATH=\"$HERE/usr/venv/bin:$PATH\"\n\
         exec \"$HERE/usr/venv/bin/python3\" \"$HERE/usr/bin/{}\" \"$@\"\n",
        entry_file_name
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_fixed_template() {
        let entry = DesktopEntry::for_version("1.2");
        assert_eq!(entry.file_name(), "kid3-tag-copy.desktop");
        assert_eq!(
            entry.to_string(),
            "[Desktop Entry]\n\
             Type=Application\n\
             Name=Kid3 Tag Copy\n\
             Comment=Copy tags between audio files using kid3-cli\n\
             Exec=kid3-tag-copy\n\
             Icon=kid3-tag-copy\n\
             Categories=AudioVideo;Audio;\n\
             Terminal=false\n\
             X-AppImage-Version=1.2\n"
        );
    }

    #[test]
    fn app_run_execs_entry_point() {
        let script = app_run_script("kid3-tag-copy.py");
        assert!(script.starts_with("#!/bin/sh\n"));
        assert!(script.contains("\"$HERE/usr/bin/kid3-tag-copy.py\" \"$@\""));
    }
}
