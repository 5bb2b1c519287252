//! Build-time packaging of the GUI front end into a portable AppImage.

pub mod builder;
pub mod desktop_entry;
pub mod method;

pub use builder::{HttpDownloader, PackageBuilder, PackageConfig};
pub use method::BundleMethod;
