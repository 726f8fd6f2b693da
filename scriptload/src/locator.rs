//! Code for interacting with resource locators, the strings that name a loadable script.

use std::borrow::Borrow;
use std::fmt::{Debug, Display, Formatter};
use std::ops::Deref;
use std::path::{Component, Path, PathBuf};
use std::rc::Rc;

/// Prefix marking a locator that names a module native to the host process.
pub const NATIVE_PREFIX: &str = "node|";

/// An opaque string identifying a loadable script.
///
/// Two locators are equal only if their contents are byte-identical; no normalization is performed. Cloning a locator
/// is cheap.
#[derive(Clone, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct Locator(Rc<str>);

/// The two forms of locator recognized by the host process loader.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Kind<'a> {
    /// A `node|<name>` locator, resolved through the native require hook.
    Native(&'a str),
    /// Anything else, interpreted as a file URI or a file path by [`Locator::to_file_path`].
    File,
}

macro_rules! format_impls {
    ($implementor: ident) => {
        impl Debug for $implementor {
            fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
                Debug::fmt(&self.0, f)
            }
        }

        impl Display for $implementor {
            fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
                Display::fmt(&self.0, f)
            }
        }
    };
}

format_impls!(Locator);

impl Deref for Locator {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Locator {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Locator {
    fn from(locator: &str) -> Self {
        Self(Rc::from(locator))
    }
}

impl From<String> for Locator {
    fn from(locator: String) -> Self {
        Self(Rc::from(locator))
    }
}

impl Locator {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Determines which form this locator takes.
    pub fn kind(&self) -> Kind<'_> {
        match self.0.strip_prefix(NATIVE_PREFIX) {
            Some(rest) => Kind::Native(rest.split('|').next().unwrap_or(rest)),
            None => Kind::File,
        }
    }

    /// Converts a file locator into a filesystem path.
    ///
    /// `file:` URIs are decoded, anything else is treated as a path as-is. Returns `None` for `file:` URIs that do not
    /// name a local path.
    pub fn to_file_path(&self) -> Option<PathBuf> {
        if self.0.starts_with("file:") {
            url::Url::parse(&self.0).ok()?.to_file_path().ok()
        } else {
            Some(PathBuf::from(&*self.0))
        }
    }
}

/// Collapses `.` and `..` components without touching the filesystem.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => (),
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use crate::locator::{normalize_path, Kind, Locator};
    use std::path::{Path, PathBuf};

    #[test]
    fn native_locators_are_recognized() {
        assert_eq!(Locator::from("node|fs").kind(), Kind::Native("fs"));
        assert_eq!(Locator::from("node|path|extra").kind(), Kind::Native("path"));
        assert_eq!(Locator::from("node-fs").kind(), Kind::File);
        assert_eq!(Locator::from("/app/node|fs.js").kind(), Kind::File);
    }

    #[test]
    fn locators_compare_by_content() {
        assert_eq!(Locator::from("a/b.js"), Locator::from(String::from("a/b.js")));
        assert_ne!(Locator::from("a/b.js"), Locator::from("a/./b.js"));
    }

    #[cfg(unix)]
    #[test]
    fn file_uri_is_converted_to_path() {
        let locator = Locator::from("file:///tmp/some%20dir/main.js");
        assert_eq!(locator.to_file_path(), Some(PathBuf::from("/tmp/some dir/main.js")));
        assert_eq!(Locator::from("/tmp/main.js").to_file_path(), Some(PathBuf::from("/tmp/main.js")));
    }

    #[test]
    fn path_normalization_collapses_dots() {
        assert_eq!(normalize_path(Path::new("/a/./b/../c.js")), PathBuf::from("/a/c.js"));
    }
}
