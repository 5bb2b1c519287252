use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use log::{debug, info, warn};
use regex::Regex;
use crate::package::desktop_entry::{app_run_script, DesktopEntry, APP_ID};
use crate::package::method::BundleMethod;
use crate::utils::file_ops::{make_executable, FileManager};
use crate::utils::process::{find_in, Invocation, Runner};
use crate::{Result, TagCopyError};

pub const GUI_DEPENDENCY: &str = "PySide6";
pub const APPIMAGETOOL_FILE: &str = "appimagetool-x86_64.AppImage";
pub const APPIMAGETOOL_URL: &str =
    "https://github.com/AppImage/appimagetool/releases/download/continuous/appimagetool-x86_64.AppImage";

const PYTHON_CANDIDATES: &[&str] = &["python3", "python"];
const IMAGE_TOOL_CANDIDATES: &[&str] = &["magick", "convert"];

pub fn artifact_name(version: &str) -> String {
    format!("Kid3TagCopy-{}-x86_64.AppImage", version)
}

pub fn validate_version(version: &str) -> Result<()> {
    let pattern = Regex::new(r"^\d+(\.\d+)*$").expect("version pattern is valid");
    if pattern.is_match(version) {
        Ok(())
    } else {
        Err(TagCopyError::InvalidVersion(version.to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct PackageConfig {
    pub version: String,
    pub method: BundleMethod,
    pub entry: PathBuf,
    pub build_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl PackageConfig {
    pub fn staging_dir(&self) -> PathBuf {
        self.build_dir.join("AppDir")
    }

    pub fn venv_dir(&self) -> PathBuf {
        self.build_dir.join("venv")
    }

    pub fn cached_appimagetool(&self) -> PathBuf {
        self.build_dir.join(APPIMAGETOOL_FILE)
    }

    fn venv_bin(&self, program: &str) -> PathBuf {
        self.venv_dir().join("bin").join(program)
    }

    fn entry_file_name(&self) -> Result<String> {
        self.entry
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| TagCopyError::InvalidPath(self.entry.clone()))
    }
}

/// Fetches a remote file to a local path.
pub trait Downloader {
    fn download(&self, url: &str, destination: &Path) -> Result<()>;
}

pub struct HttpDownloader;

impl Downloader for HttpDownloader {
    fn download(&self, url: &str, destination: &Path) -> Result<()> {
        println!("Downloading {}", url);
        let response = ureq::get(url).call()?;
        let partial = destination.with_extension("part");
        let mut file = fs::File::create(&partial)?;
        io::copy(&mut response.into_reader(), &mut file)?;
        drop(file);
        fs::rename(&partial, destination)?;
        Ok(())
    }
}

/// Assembles the staging directory and hands it to a bundling backend.
/// Every step aborts the build on failure except icon generation.
pub struct PackageBuilder<R: Runner, D: Downloader> {
    config: PackageConfig,
    runner: R,
    downloader: D,
    path_var: OsString,
}

impl<R: Runner, D: Downloader> PackageBuilder<R, D> {
    pub fn new(config: PackageConfig, runner: R, downloader: D) -> Self {
        let path_var = std::env::var_os("PATH").unwrap_or_default();
        Self::with_search_path(config, runner, downloader, path_var)
    }

    pub fn with_search_path(config: PackageConfig, runner: R, downloader: D, path_var: OsString) -> Self {
        Self {
            config,
            runner,
            downloader,
            path_var,
        }
    }

    fn locate(&self, candidates: &[&str]) -> Option<PathBuf> {
        candidates.iter().find_map(|name| find_in(name, &self.path_var))
    }

    fn run_checked(&self, invocation: Invocation) -> Result<()> {
        println!("Running: {}", invocation);
        self.runner.run(&invocation)?.check(&invocation)?;
        Ok(())
    }

    /// Run every step in order and return the path of the produced artifact.
    pub fn build(&self) -> Result<PathBuf> {
        let config = &self.config;
        validate_version(&config.version)?;
        println!("=== Packaging {} {} with {} ===", APP_ID, config.version, config.method);

        let python = self
            .locate(PYTHON_CANDIDATES)
            .ok_or_else(|| TagCopyError::ToolNotFound("python3".to_string()))?;
        debug!("Using Python interpreter {}", python.display());

        let entry_name = config.entry_file_name()?;
        if !config.entry.is_file() {
            return Err(TagCopyError::InvalidPath(config.entry.clone()));
        }

        let staging = config.staging_dir();
        if staging.exists() {
            fs::remove_dir_all(&staging)?;
        }
        let files = FileManager::new(&staging);
        files.ensure_directory(&staging)?;
        files.ensure_directory(&config.output_dir)?;

        self.generate_icon(&staging.join(format!("{}.png", APP_ID)));

        let desktop = DesktopEntry::for_version(&config.version);
        files.write_file(desktop.file_name(), &desktop.to_string(), false)?;

        self.provision_venv(&python)?;

        println!("\nStaging application in {}", staging.display());
        files.copy_file(&config.entry, Path::new("usr/bin").join(&entry_name))?;
        let copied = files.copy_tree(config.venv_dir(), "usr/venv")?;
        println!("Copied {} runtime files", copied);
        files.write_file("AppRun", &app_run_script(&entry_name), true)?;

        let artifact = match config.method {
            BundleMethod::AppImageTool => self.bundle_appimagetool(&staging)?,
            BundleMethod::Briefcase => self.bundle_briefcase()?,
            BundleMethod::PythonAppImage => self.bundle_python_appimage(&staging, &entry_name)?,
        };

        println!("\n=== Package written to {} ===", artifact.display());
        Ok(artifact)
    }

    fn generate_icon(&self, icon_path: &Path) {
        let Some(tool) = self.locate(IMAGE_TOOL_CANDIDATES) else {
            debug!("No image tool found, skipping icon generation");
            return;
        };

        let invocation = Invocation::new(&tool)
            .args(["-size", "256x256", "xc:#2e5c8a"])
            .args(["-gravity", "center", "-fill", "white", "-pointsize", "96"])
            .args(["-annotate", "+0+0", "K3"])
            .arg(icon_path);
        match self.runner.run(&invocation).and_then(|out| out.check(&invocation)) {
            Ok(_) => info!("Generated icon {}", icon_path.display()),
            Err(e) => warn!("Icon generation failed, continuing without icon: {}", e),
        }
    }

    fn provision_venv(&self, python: &Path) -> Result<()> {
        let venv = self.config.venv_dir();
        println!("\nCreating virtual environment in {}", venv.display());
        self.run_checked(Invocation::new(python).args(["-m", "venv"]).arg(&venv))?;

        let mut packages = vec![GUI_DEPENDENCY];
        packages.extend(self.config.method.pip_package());
        self.run_checked(
            Invocation::new(self.config.venv_bin("pip"))
                .arg("install")
                .args(packages),
        )
    }

    fn bundle_appimagetool(&self, staging: &Path) -> Result<PathBuf> {
        let tool = self.config.cached_appimagetool();
        if tool.is_file() {
            debug!("Using cached {}", tool.display());
        } else {
            self.downloader.download(APPIMAGETOOL_URL, &tool)?;
            make_executable(&tool)?;
        }

        let artifact = self.config.output_dir.join(artifact_name(&self.config.version));
        self.run_checked(
            Invocation::new(&tool)
                .arg(staging)
                .arg(&artifact)
                .env("ARCH", "x86_64"),
        )?;
        Ok(artifact)
    }

    /// Briefcase works from the project holding the entry point and leaves
    /// its image in `<project>/dist`; that image is moved to the output dir.
    fn bundle_briefcase(&self) -> Result<PathBuf> {
        let project = self
            .config
            .entry
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();
        let briefcase = self.config.venv_bin("briefcase");

        for step in ["create", "build", "package"] {
            self.run_checked(
                Invocation::new(&briefcase)
                    .args([step, "linux", "appimage", "--no-input"])
                    .current_dir(&project),
            )?;
        }

        let dist = project.join("dist");
        let built = fs::read_dir(&dist)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .find(|path| path.extension().map_or(false, |ext| ext == "AppImage"))
            .ok_or_else(|| TagCopyError::InvalidPath(dist.clone()))?;

        let artifact = self.config.output_dir.join(artifact_name(&self.config.version));
        fs::rename(&built, &artifact)?;
        Ok(artifact)
    }

    /// python-appimage builds from a recipe directory: requirements, an
    /// entrypoint, the desktop entry and icon.
    fn bundle_python_appimage(&self, staging: &Path, entry_name: &str) -> Result<PathBuf> {
        let recipe_dir = self.config.build_dir.join("recipe");
        if recipe_dir.exists() {
            fs::remove_dir_all(&recipe_dir)?;
        }
        let recipe = FileManager::new(&recipe_dir);
        recipe.write_file("requirements.txt", &format!("{}\n", GUI_DEPENDENCY), false)?;
        recipe.write_file(
            "entrypoint.sh",
            &format!(
                "{{{{ python-executable }}}} \"${{APPDIR}}/usr/bin/{}\" \"$@\"\n",
                entry_name
            ),
            false,
        )?;
        recipe.copy_file(staging.join(format!("{}.desktop", APP_ID)), format!("{}.desktop", APP_ID))?;
        let icon = staging.join(format!("{}.png", APP_ID));
        if icon.is_file() {
            recipe.copy_file(&icon, format!("{}.png", APP_ID))?;
        }
        recipe.copy_file(&self.config.entry, Path::new("usr/bin").join(entry_name))?;

        let name = format!("Kid3TagCopy-{}", self.config.version);
        self.run_checked(
            Invocation::new(self.config.venv_bin("python-appimage"))
                .args(["build", "app", "--name", name.as_str()])
                .arg(fs::canonicalize(&recipe_dir)?)
                .current_dir(&self.config.output_dir),
        )?;
        Ok(self.config.output_dir.join(artifact_name(&self.config.version)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use pretty_assertions::assert_eq;
    use crate::utils::process::ProcessOutput;

    #[test]
    fn version_must_be_dotted_numbers() {
        assert!(validate_version("1.0").is_ok());
        assert!(validate_version("2").is_ok());
        assert!(validate_version("1.2.10").is_ok());
        assert!(matches!(validate_version("1.0-beta"), Err(TagCopyError::InvalidVersion(_))));
        assert!(validate_version("").is_err());
        assert!(validate_version("../1").is_err());
    }

    #[test]
    fn artifact_carries_product_and_version() {
        assert_eq!(artifact_name("1.0"), "Kid3TagCopy-1.0-x86_64.AppImage");
    }

    /// Records invocations and creates the venv directory when asked to.
    struct FakeRunner {
        seen: RefCell<Vec<Invocation>>,
        fail_program: Option<&'static str>,
    }

    impl Runner for FakeRunner {
        fn run(&self, invocation: &Invocation) -> Result<ProcessOutput> {
            self.seen.borrow_mut().push(invocation.clone());
            if invocation.args.iter().any(|a| *a == "venv") {
                let dir = PathBuf::from(invocation.args.last().unwrap());
                fs::create_dir_all(dir.join("bin")).unwrap();
                fs::write(dir.join("pyvenv.cfg"), "home = /usr/bin\n").unwrap();
            }
            let failed = self
                .fail_program
                .map_or(false, |p| invocation.program_name().ends_with(p));
            Ok(ProcessOutput {
                success: !failed,
                code: Some(if failed { 1 } else { 0 }),
                stderr: if failed { "install failed".into() } else { String::new() },
                ..Default::default()
            })
        }
    }

    struct FakeDownloader(RefCell<Vec<String>>);

    impl Downloader for FakeDownloader {
        fn download(&self, url: &str, destination: &Path) -> Result<()> {
            self.0.borrow_mut().push(url.to_string());
            fs::write(destination, "appimagetool")?;
            Ok(())
        }
    }

    struct Fixture {
        dir: tempfile::TempDir,
        bin: PathBuf,
    }

    impl Fixture {
        fn new(tools: &[&str]) -> Self {
            let dir = tempfile::tempdir().unwrap();
            let bin = dir.path().join("bin");
            fs::create_dir_all(&bin).unwrap();
            for tool in tools {
                let path = bin.join(tool);
                fs::write(&path, "#!/bin/sh\n").unwrap();
                make_executable(&path).unwrap();
            }
            fs::write(dir.path().join("kid3-tag-copy.py"), "print('hi')\n").unwrap();
            Self { dir, bin }
        }

        fn config(&self, method: BundleMethod) -> PackageConfig {
            PackageConfig {
                version: "1.0".into(),
                method,
                entry: self.dir.path().join("kid3-tag-copy.py"),
                build_dir: self.dir.path().join("build"),
                output_dir: self.dir.path().join("dist"),
            }
        }

        fn builder(
            &self,
            method: BundleMethod,
            fail_program: Option<&'static str>,
        ) -> PackageBuilder<FakeRunner, FakeDownloader> {
            PackageBuilder::with_search_path(
                self.config(method),
                FakeRunner { seen: RefCell::default(), fail_program },
                FakeDownloader(RefCell::default()),
                std::env::join_paths([&self.bin]).unwrap(),
            )
        }
    }

    fn programs(builder: &PackageBuilder<FakeRunner, FakeDownloader>) -> Vec<String> {
        builder
            .runner
            .seen
            .borrow()
            .iter()
            .map(|inv| {
                Path::new(&inv.program)
                    .file_name()
                    .unwrap()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect()
    }

    #[test]
    fn missing_python_fails_before_any_command() {
        let fixture = Fixture::new(&[]);
        let builder = fixture.builder(BundleMethod::AppImageTool, None);
        assert!(matches!(builder.build(), Err(TagCopyError::ToolNotFound(name)) if name == "python3"));
        assert!(builder.runner.seen.borrow().is_empty());
    }

    #[test]
    fn appimagetool_build_downloads_tool_once_and_stages_files() {
        let fixture = Fixture::new(&["python3"]);
        let builder = fixture.builder(BundleMethod::AppImageTool, None);
        let artifact = builder.build().unwrap();

        assert_eq!(artifact, fixture.dir.path().join("dist/Kid3TagCopy-1.0-x86_64.AppImage"));
        assert_eq!(programs(&builder), vec!["python3", "pip", APPIMAGETOOL_FILE]);
        assert_eq!(*builder.downloader.0.borrow(), vec![APPIMAGETOOL_URL.to_string()]);

        {
            let seen = builder.runner.seen.borrow();
            assert_eq!(seen[1].args, vec![OsString::from("install"), OsString::from("PySide6")]);
        }

        let staging = fixture.dir.path().join("build/AppDir");
        assert!(staging.join("kid3-tag-copy.desktop").is_file());
        assert!(staging.join("AppRun").is_file());
        assert!(staging.join("usr/bin/kid3-tag-copy.py").is_file());
        assert!(staging.join("usr/venv/pyvenv.cfg").is_file());
        // No image tool on PATH
        assert!(!staging.join("kid3-tag-copy.png").exists());

        // Second build reuses the cached tool
        let again = fixture.builder(BundleMethod::AppImageTool, None);
        again.build().unwrap();
        assert!(again.downloader.0.borrow().is_empty());
    }

    #[test]
    fn icon_is_generated_when_image_tool_is_present() {
        let fixture = Fixture::new(&["python3", "convert"]);
        let builder = fixture.builder(BundleMethod::AppImageTool, None);
        builder.build().unwrap();
        assert_eq!(programs(&builder)[0], "convert");
    }

    #[test]
    fn failed_icon_generation_is_not_fatal() {
        let fixture = Fixture::new(&["python3", "magick"]);
        let builder = fixture.builder(BundleMethod::AppImageTool, Some("magick"));
        assert!(builder.build().is_ok());
    }

    #[test]
    fn pip_failure_aborts_the_build() {
        let fixture = Fixture::new(&["python3"]);
        let builder = fixture.builder(BundleMethod::AppImageTool, Some("pip"));
        match builder.build() {
            Err(TagCopyError::CommandFailed { stderr, .. }) => assert_eq!(stderr, "install failed"),
            other => panic!("unexpected: {:?}", other),
        }
        assert_eq!(programs(&builder), vec!["python3", "pip"]);
    }

    #[test]
    fn python_appimage_installs_backend_and_writes_recipe() {
        let fixture = Fixture::new(&["python3"]);
        let builder = fixture.builder(BundleMethod::PythonAppImage, None);
        builder.build().unwrap();

        assert_eq!(programs(&builder), vec!["python3", "pip", "python-appimage"]);
        let seen = builder.runner.seen.borrow();
        assert_eq!(
            seen[1].args,
            vec![OsString::from("install"), OsString::from("PySide6"), OsString::from("python-appimage")]
        );

        let recipe = fixture.dir.path().join("build/recipe");
        assert_eq!(fs::read_to_string(recipe.join("requirements.txt")).unwrap(), "PySide6\n");
        assert_eq!(
            fs::read_to_string(recipe.join("entrypoint.sh")).unwrap(),
            "{{ python-executable }} \"${APPDIR}/usr/bin/kid3-tag-copy.py\" \"$@\"\n"
        );
        assert!(builder.downloader.0.borrow().is_empty());
    }

    #[test]
    fn missing_entry_point_is_rejected() {
        let fixture = Fixture::new(&["python3"]);
        fs::remove_file(fixture.dir.path().join("kid3-tag-copy.py")).unwrap();
        let builder = fixture.builder(BundleMethod::AppImageTool, None);
        assert!(matches!(builder.build(), Err(TagCopyError::InvalidPath(_))));
    }
}
