//! One-time style setup.
//!
//! Hidden elements must leave the layout, and transition names need a rule
//! before the host animates anything. The stylesheet is installed at most once
//! per process, however many hosts or engines are created.

use crate::host::Host;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

pub const BASE_STYLES: &str = "\
[hidden] { display: none !important; }
::view-transition-group(*) { animation-duration: 180ms; }
";

static STYLES_INSTALLED: AtomicBool = AtomicBool::new(false);

/// Install [`BASE_STYLES`] into `host` unless some host already received them.
///
/// Returns whether this call installed the stylesheet.
pub fn install_styles<H: Host>(host: &mut H) -> bool {
    if STYLES_INSTALLED.swap(true, Ordering::SeqCst) {
        return false;
    }
    host.install_stylesheet(BASE_STYLES);
    debug!("base styles installed");
    true
}

pub fn styles_installed() -> bool {
    STYLES_INSTALLED.load(Ordering::SeqCst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemDocument;

    // The latch is process-wide, so every assertion about it lives in one test.
    #[test]
    fn installs_once_per_process() {
        let mut first = MemDocument::new();
        let mut second = MemDocument::new();

        let installed = install_styles(&mut first);
        let again = install_styles(&mut second);

        assert!(styles_installed());
        assert!(!again);
        if installed {
            assert_eq!(first.stylesheets(), &[BASE_STYLES.to_string()]);
        }
        assert!(second.stylesheets().is_empty());
    }
}
